#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use stacknav::{
    HostHandle, ModelMap, NavigationController, NavigatorConfig, Node, NodeCore, NodeHandle, NodeKind, NodeTag,
    SlotId, StackHost, TabAffinity, TabsHandle, TabsNavigator, MAIN_HOST_TAG,
};

pub static PAGE: NodeKind = NodeKind::new("Page");
pub static DETAIL: NodeKind = NodeKind::new("Detail").single_instance();
pub static ANY_TAB: NodeKind = NodeKind::new("AnyTab").with_tab_affinity(TabAffinity::Any);
pub static THIRD_TAB: NodeKind = NodeKind::new("ThirdTab").with_tab_affinity(TabAffinity::Tab(2));
pub static CONTAINER: NodeKind = NodeKind::new("Container");

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Leaf screen recording what it was told
pub struct Page {
    core: NodeCore,
    pub intercept_back: bool,
    pub consume_tab_click: bool,
    pub results: Vec<(i32, i32, ModelMap)>,
}

impl Node for Page {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn on_back_intercept(&mut self) -> bool {
        self.intercept_back
    }

    fn on_tab_clicked(&mut self) -> bool {
        self.consume_tab_click
    }

    fn on_dialog_result(&mut self, request_code: i32, result_code: i32, data: &ModelMap) {
        self.results.push((request_code, result_code, data.clone()));
    }
}

pub fn page_of(kind: &'static NodeKind) -> Rc<RefCell<Page>> {
    Rc::new(RefCell::new(Page {
        core: NodeCore::new(kind),
        intercept_back: false,
        consume_tab_click: false,
        results: Vec::new(),
    }))
}

pub fn page() -> Rc<RefCell<Page>> {
    page_of(&PAGE)
}

pub fn handle<T: Node + 'static>(node: &Rc<RefCell<T>>) -> NodeHandle {
    let node: NodeHandle = node.clone();
    node
}

pub fn tag_of<T: Node>(node: &Rc<RefCell<T>>) -> NodeTag {
    node.borrow().tag().clone()
}

/// Container screen owning a host tagged with the container's own tag
pub struct Container {
    core: NodeCore,
    pub host: Rc<RefCell<StackHost>>,
}

impl Node for Container {
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

pub fn container() -> Rc<RefCell<Container>> {
    let core = NodeCore::new(&CONTAINER);
    let host = Rc::new(RefCell::new(StackHost::new(core.tag().as_str(), SlotId(1))));
    Rc::new(RefCell::new(Container { core, host }))
}

pub fn host_handle(host: &Rc<RefCell<StackHost>>) -> HostHandle {
    let host: HostHandle = host.clone();
    host
}

/// Tab widget whose switches only pause the old tab. Tests resume the new
/// tab themselves, the way an asynchronous lifecycle would.
pub struct Tabs {
    pub current: usize,
    pub containers: Vec<Rc<RefCell<Container>>>,
    pub switches: Vec<usize>,
}

impl TabsNavigator for Tabs {
    fn current_tab_index(&self) -> usize {
        self.current
    }

    fn tab_count(&self) -> usize {
        self.containers.len()
    }

    fn current_container(&self) -> Option<HostHandle> {
        let container = self.containers.get(self.current)?;
        Some(host_handle(&container.borrow().host))
    }

    fn switch_to_tab(&mut self, index: usize) {
        if let Some(old) = self.containers.get(self.current) {
            old.borrow().host.borrow_mut().lifecycle_mut().on_pause();
        }
        self.switches.push(index);
        self.current = index;
    }
}

impl Tabs {
    pub fn host(&self, index: usize) -> Rc<RefCell<StackHost>> {
        self.containers[index].borrow().host.clone()
    }
}

pub struct Fixture {
    pub controller: NavigationController,
    pub root: Rc<RefCell<StackHost>>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(NavigatorConfig::default())
    }

    pub fn with_config(config: NavigatorConfig) -> Self {
        init_logging();
        let root = Rc::new(RefCell::new(StackHost::new(MAIN_HOST_TAG, SlotId(1))));
        let mut controller = NavigationController::new(config);
        controller.attach_host(&host_handle(&root));
        Self { controller, root }
    }

    pub fn show<T: Node + 'static>(&mut self, node: &Rc<RefCell<T>>) -> NodeTag {
        self.controller.show(handle(node));
        tag_of(node)
    }

    pub fn root_handle(&self) -> HostHandle {
        host_handle(&self.root)
    }

    pub fn root_tags(&self) -> Vec<NodeTag> {
        self.root.borrow().tags()
    }

    /// Register a tab widget with `count` containers, each seeded with a
    /// root child. Only the first tab starts resumed.
    pub fn with_tabs(&mut self, count: usize) -> Rc<RefCell<Tabs>> {
        let containers: Vec<Rc<RefCell<Container>>> = (0..count).map(|_| container()).collect();
        for (index, container) in containers.iter().enumerate() {
            self.controller.add_initial_child(&handle(container), handle(&page()));
            if index != 0 {
                container.borrow().host.borrow_mut().lifecycle_mut().on_pause();
            }
        }

        let tabs = Rc::new(RefCell::new(Tabs {
            current: 0,
            containers,
            switches: Vec::new(),
        }));
        let handle: TabsHandle = tabs.clone();
        self.controller.register_tabs(&handle);
        tabs
    }

    /// Resume the current tab's container and report it to the controller
    pub fn resume_current_tab(&mut self, tabs: &Rc<RefCell<Tabs>>) {
        let host = {
            let tabs = tabs.borrow();
            tabs.host(tabs.current)
        };
        {
            let mut host = host.borrow_mut();
            host.lifecycle_mut().on_resume();
            host.lifecycle_mut().on_post_resume();
        }
        self.controller.on_container_resumed(&host_handle(&host));
    }
}
