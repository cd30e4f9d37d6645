use anyhow::{Context, Result};
use colored::*;
use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use super::screens::{self, Journal, Screen, TabHostScreen};
use stacknav::{
    Config, Dialog, DialogController, Host, HostHandle, ModelMap, NavigationController, Node, NodeHandle,
    NodeKind, ShowOptions, SlotId, StackHost, TabsHandle, TabsNavigator, MAIN_HOST_TAG,
};

/// Delay between a tab switch and its container reporting ready
const RESUME_DELAY: Duration = Duration::from_millis(5);

/// How long `settle` waits for further lifecycle events
const SETTLE_TIMEOUT: Duration = Duration::from_millis(50);

/// The four-tab demo application wired to a navigation controller
pub struct DemoApp {
    controller: NavigationController,
    dialogs: DialogController,
    root: Rc<RefCell<StackHost>>,
    tab_host: Rc<RefCell<TabHostScreen>>,
    resumed: UnboundedReceiver<usize>,
    journal: Journal,
}

impl DemoApp {
    /// Build the application. Must run inside a tokio runtime: tab
    /// containers resume from a spawned lifecycle driver.
    pub fn new(config: &Config) -> Self {
        let slot = SlotId(config.navigation.default_slot);
        let root = Rc::new(RefCell::new(StackHost::new(MAIN_HOST_TAG, slot)));
        let mut controller = NavigationController::new(config.navigation.clone());
        let root_handle: HostHandle = root.clone();
        controller.attach_host(&root_handle);

        let (switch_tx, mut switch_rx) = mpsc::unbounded_channel::<usize>();
        let (resume_tx, resumed) = mpsc::unbounded_channel::<usize>();
        tokio::spawn(async move {
            while let Some(index) = switch_rx.recv().await {
                tokio::time::sleep(RESUME_DELAY).await;
                if resume_tx.send(index).is_err() {
                    break;
                }
            }
        });

        let tab_host = Rc::new(RefCell::new(TabHostScreen::new(
            config.demo.tabs.clone(),
            slot,
            switch_tx,
        )));
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));

        let tab_node: NodeHandle = tab_host.clone();
        controller.show(tab_node);

        let containers: Vec<NodeHandle> = tab_host
            .borrow()
            .containers()
            .iter()
            .map(|container| {
                let node: NodeHandle = container.clone();
                node
            })
            .collect();
        for (index, container) in containers.iter().enumerate() {
            let title = tab_host.borrow().title(index).to_string();
            let root_child = Screen::handle(&screens::TAB_ROOT, title, &journal);
            controller.add_initial_child(container, root_child);
        }

        let tabs: TabsHandle = tab_host.clone();
        controller.register_tabs(&tabs);
        info!("Demo app ready with {} tabs", containers.len());

        Self {
            controller,
            dialogs: DialogController::new(),
            root,
            tab_host,
            resumed,
            journal,
        }
    }

    pub fn controller(&mut self) -> &mut NavigationController {
        &mut self.controller
    }

    pub fn screen(&self, kind: &'static NodeKind, title: &str) -> NodeHandle {
        Screen::handle(kind, title, &self.journal)
    }

    /// Deliver lifecycle events until none arrive for a while
    pub async fn settle(&mut self) {
        while let Ok(Some(index)) = tokio::time::timeout(SETTLE_TIMEOUT, self.resumed.recv()).await {
            self.on_tab_resumed(index);
        }
    }

    fn on_tab_resumed(&mut self, index: usize) {
        let (container, current) = {
            let tab_host = self.tab_host.borrow();
            (tab_host.containers().get(index).cloned(), tab_host.current_tab_index())
        };
        let Some(container) = container else {
            debug!("Resume for unknown tab {}", index);
            return;
        };
        if index != current {
            debug!("Tab {} left before it resumed", index);
            return;
        }
        let stack = container.borrow().stack();
        {
            let mut stack = stack.borrow_mut();
            stack.lifecycle_mut().on_resume();
            stack.lifecycle_mut().on_post_resume();
        }
        let host: HostHandle = stack;
        self.controller.on_container_resumed(&host);
    }

    pub fn print_snapshot(&self, label: &str) {
        println!("{}", label.bright_white().bold());

        let root: HostHandle = self.root.clone();
        println!("  {} {}", "root:".bright_cyan(), screens::stack_tags(&root).join(" > "));

        let tab_host = self.tab_host.borrow();
        let current = tab_host.current_tab_index();
        for (index, container) in tab_host.containers().iter().enumerate() {
            let stack: HostHandle = container.borrow().stack();
            let marker = if index == current { "●".bright_green() } else { "○".dimmed() };
            let ready = if stack.borrow().is_ready() { "" } else { " (paused)" };
            println!(
                "  {} {:<8} {}{}",
                marker,
                tab_host.title(index),
                screens::stack_tags(&stack).join(" > "),
                ready.dimmed()
            );
        }

        let pending = self.controller.tabs().pending_len();
        if pending > 0 {
            println!("  {} {}", "pending:".bright_yellow(), pending);
        }
        println!();
    }

    fn print_journal(&self) {
        for line in self.journal.borrow().iter() {
            println!("  {} {}", "✓".bright_green().bold(), line);
        }
    }

    fn back(&mut self, label: &str) {
        let handled = self.controller.on_back_pressed();
        println!("{} {} -> {}", "⟵ back".bright_magenta(), label, if handled { "handled" } else { "not handled" });
    }
}

/// Cross-tab deferral, tab back handling and tab reselection
pub async fn play_tabs(app: &mut DemoApp) -> Result<()> {
    app.print_snapshot("Start");

    let item = app.screen(&screens::ITEM, "Item");
    app.controller().show(item);
    app.print_snapshot("Item shown in the current tab");

    let results = app.screen(&screens::SEARCH_RESULTS, "Results");
    app.controller().show(results);
    app.print_snapshot("Results requested for the second tab");

    app.settle().await;
    app.print_snapshot("Second tab resumed, pending request delivered");

    app.back("in second tab");
    app.print_snapshot("After back");

    app.back("on second tab root");
    app.settle().await;
    app.print_snapshot("After back to the home tab");

    app.controller().on_tab_reselected();
    app.print_snapshot("Home tab reselected");

    app.controller().repopulate_tabs();
    app.print_snapshot("Tabs repopulated");
    Ok(())
}

/// Showing a single-instance kind again replaces the existing instance
pub async fn play_singleton(app: &mut DemoApp) -> Result<()> {
    let first = app.screen(&screens::PAGE, "First");
    app.controller().show(first);
    let detail = app.screen(&screens::DETAIL, "Detail");
    app.controller().show(detail);
    let second = app.screen(&screens::PAGE, "Second");
    app.controller().show(second);
    app.print_snapshot("Detail buried under a page");

    let again = app.screen(&screens::DETAIL, "Detail again");
    let again_tag = again.borrow().tag().clone();
    app.controller().show(again);
    app.print_snapshot("Detail shown again");

    let previous = app
        .controller()
        .previous_tag(&again_tag)
        .map(|tag| tag.kind_name().to_string())
        .context("Replaced detail lost its back-link")?;
    println!("  new detail goes back to a {}\n", previous.bright_cyan());
    Ok(())
}

/// A skip-on-pop screen is bypassed by back presses
pub async fn play_skip_on_pop(app: &mut DemoApp) -> Result<()> {
    let a = app.screen(&screens::PAGE, "A");
    app.controller().show(a);
    let b = app.screen(&screens::PAGE, "B");
    app.controller().show_with(b, ShowOptions::new().with_skip_on_pop());
    let c = app.screen(&screens::PAGE, "C");
    app.controller().show(c);
    app.print_snapshot("A > B (skip-on-pop) > C");

    app.back("from C");
    app.print_snapshot("Back lands on A");
    Ok(())
}

/// A dialog result reaches its target even when dismissed while paused
pub async fn play_dialog(app: &mut DemoApp) -> Result<()> {
    let page = app.screen(&screens::PAGE, "Settings");
    let page_tag = page.borrow().tag().clone();
    app.controller().show(page);

    let root: HostHandle = app.root.clone();
    let tag = app
        .dialogs
        .show(&root, Dialog::new(&screens::CONFIRM).with_target(&page_tag, 42))
        .context("Root host refused the dialog")?;
    app.dialogs.on_attach(&tag, &app.controller);
    app.dialogs.on_resume(&tag, &app.controller);
    app.dialogs.on_pause(&tag, &app.controller);

    let mut data = ModelMap::new();
    data.insert("answer".to_string(), serde_json::json!("yes"));
    app.dialogs.set_result(&tag, 1, data);
    app.dialogs.dismiss(&tag, &app.controller);
    println!(
        "{} dismissed while paused, pending: {}",
        "Confirm".bright_white().bold(),
        app.dialogs.is_dismiss_pending(&tag)
    );

    app.dialogs.on_resume(&tag, &app.controller);
    app.print_journal();
    println!();
    Ok(())
}
