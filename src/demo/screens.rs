use log::debug;
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::mpsc::UnboundedSender;

use stacknav::{
    Host, HostHandle, ModelMap, Node, NodeCore, NodeHandle, NodeKind, SlotId, StackHost, TabAffinity,
    TabsNavigator,
};

pub static TAB_HOST: NodeKind = NodeKind::new("TabHost");
pub static TAB_CONTAINER: NodeKind = NodeKind::new("TabContainer");
pub static TAB_ROOT: NodeKind = NodeKind::new("TabRoot");
pub static ITEM: NodeKind = NodeKind::new("Item").with_tab_affinity(TabAffinity::Any);
pub static SEARCH_RESULTS: NodeKind = NodeKind::new("SearchResults").with_tab_affinity(TabAffinity::Tab(1));
pub static PAGE: NodeKind = NodeKind::new("Page");
pub static DETAIL: NodeKind = NodeKind::new("Detail").single_instance();
pub static CONFIRM: NodeKind = NodeKind::new("Confirm");

/// Shared record of things screens were told
pub type Journal = Rc<RefCell<Vec<String>>>;

/// Plain leaf screen
pub struct Screen {
    core: NodeCore,
    title: String,
    journal: Journal,
}

impl Screen {
    pub fn handle(kind: &'static NodeKind, title: impl Into<String>, journal: &Journal) -> NodeHandle {
        Rc::new(RefCell::new(Self {
            core: NodeCore::new(kind),
            title: title.into(),
            journal: journal.clone(),
        }))
    }
}

impl Node for Screen {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn on_dialog_result(&mut self, request_code: i32, result_code: i32, data: &ModelMap) {
        let answer = data
            .get("answer")
            .and_then(|value| value.as_str())
            .unwrap_or("-");
        self.journal.borrow_mut().push(format!(
            "{} got result {} for request {} (answer: {})",
            self.title, result_code, request_code, answer
        ));
    }
}

/// Per-tab container. Its host carries the container's own tag.
pub struct TabContainer {
    core: NodeCore,
    host: Rc<RefCell<StackHost>>,
}

impl TabContainer {
    pub fn new(slot: SlotId) -> Self {
        let core = NodeCore::new(&TAB_CONTAINER);
        let host = Rc::new(RefCell::new(StackHost::new(core.tag().as_str(), slot)));
        Self { core, host }
    }

    pub fn stack(&self) -> Rc<RefCell<StackHost>> {
        self.host.clone()
    }
}

impl Node for TabContainer {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn child_host(&self) -> Option<HostHandle> {
        let host: HostHandle = self.host.clone();
        Some(host)
    }
}

/// Root screen owning the tab widget
pub struct TabHostScreen {
    core: NodeCore,
    host: Rc<RefCell<StackHost>>,
    titles: Vec<String>,
    containers: Vec<Rc<RefCell<TabContainer>>>,
    current: usize,
    switches: UnboundedSender<usize>,
}

impl TabHostScreen {
    /// Build the tab widget. Every container except the first starts paused.
    pub fn new(titles: Vec<String>, slot: SlotId, switches: UnboundedSender<usize>) -> Self {
        let core = NodeCore::new(&TAB_HOST);
        let host = Rc::new(RefCell::new(StackHost::new(core.tag().as_str(), slot)));

        let containers: Vec<Rc<RefCell<TabContainer>>> = titles
            .iter()
            .map(|_| Rc::new(RefCell::new(TabContainer::new(slot))))
            .collect();

        for (index, container) in containers.iter().enumerate() {
            let node: NodeHandle = container.clone();
            host.borrow_mut().attach(node);
            if index != 0 {
                container.borrow().stack().borrow_mut().lifecycle_mut().on_pause();
            }
        }

        Self {
            core,
            host,
            titles,
            containers,
            current: 0,
            switches,
        }
    }

    pub fn containers(&self) -> &[Rc<RefCell<TabContainer>>] {
        &self.containers
    }

    pub fn title(&self, index: usize) -> &str {
        self.titles.get(index).map(String::as_str).unwrap_or("?")
    }
}

impl Node for TabHostScreen {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn child_host(&self) -> Option<HostHandle> {
        let host: HostHandle = self.host.clone();
        Some(host)
    }
}

impl TabsNavigator for TabHostScreen {
    fn current_tab_index(&self) -> usize {
        self.current
    }

    fn tab_count(&self) -> usize {
        self.containers.len()
    }

    fn current_container(&self) -> Option<HostHandle> {
        let container = self.containers.get(self.current)?;
        let host = container.borrow().child_host();
        host
    }

    /// The old container pauses now; the new one resumes once the
    /// lifecycle driver reports it
    fn switch_to_tab(&mut self, index: usize) {
        if let Some(old) = self.containers.get(self.current) {
            old.borrow().stack().borrow_mut().lifecycle_mut().on_pause();
        }
        debug!("Tab {} -> {} ({})", self.current, index, self.title(index));
        self.current = index;
        if self.switches.send(index).is_err() {
            debug!("switchTo fail due to lifecycle driver gone");
        }
    }

    fn repopulate_tabs(&mut self) {
        debug!("Repopulating {} tabs", self.containers.len());
        for container in &self.containers {
            container.borrow().stack().borrow_mut().lifecycle_mut().on_create();
        }
        for (index, container) in self.containers.iter().enumerate() {
            if index != self.current {
                container.borrow().stack().borrow_mut().lifecycle_mut().on_pause();
            }
        }
    }
}

/// Back-stack of a host as short tags, bottom first
pub fn stack_tags(host: &HostHandle) -> Vec<String> {
    host.borrow()
        .back_stack()
        .iter()
        .map(|node| short_tag(node))
        .collect()
}

/// `Kind:abcd1234` form of a node's tag
pub fn short_tag(node: &NodeHandle) -> String {
    let node = node.borrow();
    let tag = node.tag();
    let discriminator: String = tag.discriminator().chars().take(8).collect();
    format!("{}:{}", tag.kind_name(), discriminator)
}
