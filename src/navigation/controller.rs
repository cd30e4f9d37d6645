use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::links::{BackLink, BackLinks};
use super::{NodeLookup, ShowOptions};
use crate::config::NavigatorConfig;
use crate::error::{log_dropped, NavError};
use crate::host::{Host, HostHandle, PopMode};
use crate::models::{ModelMap, ModelStore};
use crate::node::{has_tag, NodeHandle, NodeKind, NodeTag, SavedNode};
use crate::tabs::{PendingShow, TabRoute, TabRouter, TabsHandle};

/// What happened to an accepted show request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    /// Pushed onto a host
    Shown,

    /// Queued until its tab becomes current
    Deferred,
}

/// Central navigation orchestrator.
///
/// Owned by the application's composition root. Holds a non-owning handle to
/// the active root host, the tab router, the back-link side-table and the
/// model store. Every public operation is best-effort: rejected requests are
/// logged and leave the UI as it was.
pub struct NavigationController {
    pub(super) config: NavigatorConfig,
    active_host: Option<Weak<RefCell<dyn Host>>>,
    pub(super) tabs: TabRouter,
    links: BackLinks,
    models: ModelStore,
}

impl NavigationController {
    pub fn new(config: NavigatorConfig) -> Self {
        Self {
            config,
            active_host: None,
            tabs: TabRouter::new(),
            links: BackLinks::default(),
            models: ModelStore::new(),
        }
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Make `host` the active root host
    pub fn attach_host(&mut self, host: &HostHandle) {
        info!("Active host set to {}", host.borrow().container_tag());
        self.active_host = Some(Rc::downgrade(host));
    }

    /// Forget the active host if it is the one being detached
    pub fn detach_host(&mut self, container_tag: &str) {
        if self
            .active_host()
            .is_some_and(|host| host.borrow().container_tag() == container_tag)
        {
            info!("Active host {} detached", container_tag);
            self.active_host = None;
        }
    }

    pub fn active_host(&self) -> Option<HostHandle> {
        self.active_host.as_ref()?.upgrade()
    }

    pub fn register_tabs(&mut self, navigator: &TabsHandle) {
        debug!("Tabs navigator registered");
        self.tabs.register(navigator);
    }

    pub fn unregister_tabs(&mut self) {
        debug!("Tabs navigator unregistered");
        self.tabs.unregister();
    }

    pub fn tabs(&self) -> &TabRouter {
        &self.tabs
    }

    /// Switch tabs through the registered navigator
    pub fn switch_to_tab(&mut self, index: usize) -> bool {
        self.tabs.switch_to(index)
    }

    pub fn repopulate_tabs(&self) {
        self.tabs.repopulate();
    }

    /// Show `node` with default options
    pub fn show(&mut self, node: NodeHandle) {
        self.show_with(node, ShowOptions::default());
    }

    pub fn show_with(&mut self, node: NodeHandle, options: ShowOptions) {
        if let Err(e) = self.try_show(node, options) {
            log_dropped("showNode", &e);
        }
    }

    /// Show `node` inside the host owned by `container`
    pub fn show_child(&mut self, container: &NodeHandle, node: NodeHandle, options: ShowOptions) {
        let child_host = container.borrow().child_host();
        match child_host {
            Some(host) => self.show_with(node, options.in_host(host)),
            None => log_dropped(
                "showChildNode",
                &NavError::InvalidArgument(format!("{} is not a container", container.borrow().tag())),
            ),
        }
    }

    pub(crate) fn try_show(&mut self, node: NodeHandle, mut options: ShowOptions) -> Result<ShowOutcome, NavError> {
        let (kind, tag) = {
            let node = node.borrow();
            (node.kind(), node.tag().clone())
        };

        if options.target.is_none() && self.tabs.is_registered() {
            if let Some(affinity) = kind.tab_affinity {
                match self.tabs.route(affinity) {
                    TabRoute::Current(host) if !host.borrow().is_ready() => {
                        // A switch is still settling, queue behind it
                        debug!("{} deferred until the current tab container is ready", tag);
                        self.tabs.enqueue(PendingShow { node, options });
                        return Ok(ShowOutcome::Deferred);
                    }
                    TabRoute::Current(host) => {
                        options.slot = None;
                        options.target = Some(host);
                    }
                    TabRoute::Deferred(index) => {
                        debug!("{} deferred until tab {} is ready", tag, index);
                        self.tabs.enqueue(PendingShow { node, options });
                        self.tabs.switch_to(index);
                        return Ok(ShowOutcome::Deferred);
                    }
                    TabRoute::Unavailable => {
                        return Err(NavError::not_ready("showNode", "current tab container"));
                    }
                }
            }
        }

        let host = match options.target.take() {
            Some(host) => host,
            None => self
                .active_host()
                .ok_or_else(|| NavError::not_ready("showNode", "active host"))?,
        };

        let (container, ready, default_slot) = {
            let host = host.borrow();
            (host.container_tag().to_string(), host.is_ready(), host.default_slot())
        };
        if !ready {
            return Err(NavError::not_ready("showNode", container));
        }

        let slot = options.slot.unwrap_or(default_slot);
        if !slot.is_valid() {
            return Err(NavError::InvalidArgument(format!("{} in {}", slot, container)));
        }

        if options.clear_stack {
            self.pop_host(&host, None, PopMode::Inclusive);
        }

        // A replaced single instance dictates the back-link
        let previous = match self.evict_single_instance(&host, kind) {
            Some(back_link) => back_link,
            None => self.default_back_link(&host),
        };

        debug!("show {} in {} with back-link {:?}", tag, container, previous);
        self.links.insert(
            tag.clone(),
            BackLink {
                previous,
                skip_on_pop: options.skip_on_pop,
                owner: container.clone(),
            },
        );

        let arguments = node.borrow_mut().core_mut().take_arguments();
        host.borrow_mut().push_and_commit(node, slot, &tag);
        self.models.attach_all(Some(&container), &tag, arguments);

        Ok(ShowOutcome::Shown)
    }

    /// Back-link for a node pushed on top of `host`'s current node
    fn default_back_link(&self, host: &HostHandle) -> Option<NodeTag> {
        let current = host.borrow().current_node()?;
        let current_tag = current.borrow().tag().clone();

        match self.links.get(&current_tag) {
            Some(link) if link.skip_on_pop => link.previous.clone(),
            _ => Some(current_tag),
        }
    }

    /// Pop an existing instance of a single-instance kind off `host`.
    ///
    /// Returns `None` when the kind allows many instances or none exists,
    /// otherwise the back-link the new instance inherits.
    fn evict_single_instance(&mut self, host: &HostHandle, kind: &NodeKind) -> Option<Option<NodeTag>> {
        if !kind.single_instance {
            return None;
        }

        let existing = {
            let host = host.borrow();
            host.attached_nodes()
                .into_iter()
                .chain(host.back_stack())
                .find(|node| node.borrow().kind().is_same_kind(kind))
        }?;

        let existing_tag = existing.borrow().tag().clone();
        let back_link = self.links.previous_of(&existing_tag).cloned();
        debug!(
            "single instance {} already shown as {}, back-link {:?}",
            kind.name, existing_tag, back_link
        );

        let back_link_present = back_link
            .as_ref()
            .is_some_and(|previous| host.borrow().contains(previous));

        match &back_link {
            Some(previous) if back_link_present => self.pop_host(host, Some(previous), PopMode::Exclusive),
            _ => self.pop_host(host, Some(&existing_tag), PopMode::Inclusive),
        }

        Some(back_link)
    }

    /// Add the first child of a container node. It gets no back-link and
    /// becomes the container's root child.
    pub fn add_initial_child(&mut self, container: &NodeHandle, child: NodeHandle) {
        let child_host = container.borrow().child_host();
        let Some(host) = child_host else {
            log_dropped(
                "addInitialChild",
                &NavError::InvalidArgument(format!("{} is not a container", container.borrow().tag())),
            );
            return;
        };

        let (container_tag, slot) = {
            let host = host.borrow();
            (host.container_tag().to_string(), host.default_slot())
        };
        let tag = child.borrow().tag().clone();

        self.links.insert(
            tag.clone(),
            BackLink {
                previous: None,
                skip_on_pop: false,
                owner: container_tag.clone(),
            },
        );

        let arguments = child.borrow_mut().core_mut().take_arguments();
        host.borrow_mut().push_and_commit(child, slot, &tag);
        self.models.attach_all(Some(&container_tag), &tag, arguments);

        container.borrow_mut().core_mut().set_root_child_tag(Some(tag));
    }

    /// Deliver deferred tab requests once the current tab's container reports
    /// it is ready. Requests are shown in the order they were queued.
    pub fn on_container_resumed(&mut self, host: &HostHandle) {
        if !self.tabs.has_pending() {
            return;
        }

        let resumed_tag = host.borrow().container_tag().to_string();
        let Some(current) = self.tabs.current_container() else {
            debug!("handlePending fail due to no current tab container");
            return;
        };
        if current.borrow().container_tag() != resumed_tag {
            debug!("handlePending skipped: {} is not the current tab container", resumed_tag);
            return;
        }
        if !host.borrow().is_ready() {
            debug!("handlePending fail due to {} not ready", resumed_tag);
            return;
        }

        let pending = self.tabs.take_pending();
        debug!("Flushing {} pending nodes into {}", pending.len(), resumed_tag);
        for PendingShow { node, options } in pending {
            self.show_with(node, options.in_host(host.clone()));
        }
    }

    /// Pop `host` until `tag` is on top. False when `tag` is not in its stack.
    pub fn pop_to_tag(&mut self, host: &HostHandle, tag: &NodeTag) -> bool {
        match self.try_pop_to_tag(host, tag) {
            Ok(()) => true,
            Err(e) => {
                log_dropped("popToTag", &e);
                false
            }
        }
    }

    pub(crate) fn try_pop_to_tag(&mut self, host: &HostHandle, tag: &NodeTag) -> Result<(), NavError> {
        let (container, ready, present) = {
            let host = host.borrow();
            (host.container_tag().to_string(), host.is_ready(), host.contains(tag))
        };
        if !ready {
            return Err(NavError::not_ready("popToTag", container));
        }
        if !present {
            return Err(NavError::not_found(tag.as_str(), container));
        }

        debug!("popToTag found tag: {}", tag);
        self.pop_host(host, Some(tag), PopMode::Exclusive);
        Ok(())
    }

    /// Pop the whole stack of `host`
    pub fn clear_host(&mut self, host: &HostHandle) {
        if !host.borrow().is_ready() {
            log_dropped(
                "clearStack",
                &NavError::not_ready("clearStack", host.borrow().container_tag()),
            );
            return;
        }
        self.pop_host(host, None, PopMode::Inclusive);
    }

    /// Every pop goes through here so garbage collection follows it
    pub(super) fn pop_host(&mut self, host: &HostHandle, target: Option<&NodeTag>, mode: PopMode) {
        let before: Vec<NodeHandle> = {
            let host = host.borrow();
            host.attached_nodes().into_iter().chain(host.back_stack()).collect()
        };
        host.borrow_mut().pop_back_stack(target, mode);

        let live = host.borrow().live_tags();
        let removed: Vec<NodeHandle> = before
            .into_iter()
            .filter(|node| !live.iter().any(|tag| has_tag(node, tag)))
            .collect();
        let nested = nested_nodes(&removed);
        self.collect_garbage(host, nested);
    }

    /// Drop models and back-links of nodes `host` no longer holds, plus
    /// `nested`, the contents of removed containers
    fn collect_garbage(&mut self, host: &HostHandle, nested: Vec<(String, NodeTag)>) {
        let container = host.borrow().container_tag().to_string();
        let live = host.borrow().live_tags();

        let mut removed: Vec<NodeTag> = self
            .links
            .owned_by(&container)
            .into_iter()
            .filter(|tag| !live.contains(tag))
            .collect();

        let dropped = self.models.garbage_collect(&*host.borrow());
        for tag in dropped {
            if !removed.contains(&tag) {
                removed.push(tag);
            }
        }

        let mut pending: Vec<(String, NodeTag)> = removed
            .into_iter()
            .map(|tag| (container.clone(), tag))
            .collect();
        pending.extend(nested);
        self.forget_nodes(pending);
    }

    /// Remove nodes for good, cascading into the scopes of removed containers
    fn forget_nodes(&mut self, mut pending: Vec<(String, NodeTag)>) {
        while let Some((owner, tag)) = pending.pop() {
            self.links.remove(&tag);
            self.models.remove_node(&owner, &tag);

            let scope = tag.as_str();
            let mut nested = self.models.drop_scope(scope);
            for child in self.links.owned_by(scope) {
                if !nested.contains(&child) {
                    nested.push(child);
                }
            }
            if !nested.is_empty() {
                debug!("Dropping {} nodes scoped to removed container {}", nested.len(), scope);
            }
            pending.extend(nested.into_iter().map(|child| (scope.to_string(), child)));
        }
    }

    /// Top node of the active root host
    pub fn current_node(&self) -> Option<NodeHandle> {
        let host = self.active_host()?;
        let node = host.borrow().current_node();
        node
    }

    pub fn back_link(&self, tag: &NodeTag) -> Option<&BackLink> {
        self.links.get(tag)
    }

    pub fn previous_tag(&self, tag: &NodeTag) -> Option<&NodeTag> {
        self.links.previous_of(tag)
    }

    pub fn owner_of(&self, tag: &NodeTag) -> Option<&str> {
        self.links.get(tag).map(|link| link.owner.as_str())
    }

    pub fn models(&self) -> &ModelStore {
        &self.models
    }

    /// Attach a model to an already shown node. Dropped if it is not shown.
    pub fn attach_model<T: Serialize>(&mut self, node: &NodeHandle, key: &str, model: &T) {
        let tag = node.borrow().tag().clone();
        let owner = self.links.get(&tag).map(|link| link.owner.clone());
        self.models.attach_serialized(owner.as_deref(), &tag, key, model);
    }

    /// Attach several models to an already shown node, merging with what it
    /// has. Dropped if it is not shown.
    pub fn attach_models(&mut self, node: &NodeHandle, models: ModelMap) {
        let tag = node.borrow().tag().clone();
        let owner = self.links.get(&tag).map(|link| link.owner.clone());
        self.models.attach_all(owner.as_deref(), &tag, models);
    }

    pub fn model<T: DeserializeOwned>(&self, node: &NodeHandle, key: &str) -> Option<T> {
        let tag = node.borrow().tag().clone();
        self.models.get_as(self.owner_of(&tag), &tag, key)
    }

    pub fn model_value(&self, tag: &NodeTag, key: &str) -> Option<&Value> {
        self.models.get(self.owner_of(tag), tag, key)
    }

    /// Capture a node's navigation state before its host saves
    pub fn save_node(&self, node: &NodeHandle) -> SavedNode {
        let node = node.borrow();
        let tag = node.tag().clone();
        let link = self.links.get(&tag);

        SavedNode {
            previous_tag: link.and_then(|link| link.previous.clone()),
            skip_on_pop: link.is_some_and(|link| link.skip_on_pop),
            owner_container_tag: link.map(|link| link.owner.clone()),
            root_child_tag: node.core().root_child_tag().cloned(),
            tag,
        }
    }

    /// Re-install saved state onto a recreated node of the same kind
    pub fn restore_node(&mut self, node: &NodeHandle, saved: &SavedNode) {
        let kind_name = node.borrow().kind().name;
        if saved.tag.kind_name() != kind_name {
            log_dropped(
                "restoreNode",
                &NavError::InvalidArgument(format!("{} cannot restore into a {}", saved.tag, kind_name)),
            );
            return;
        }

        {
            let mut node = node.borrow_mut();
            node.core_mut().restore_tag(saved.tag.clone());
            node.core_mut().set_root_child_tag(saved.root_child_tag.clone());
        }

        if let Some(owner) = &saved.owner_container_tag {
            self.links.insert(
                saved.tag.clone(),
                BackLink {
                    previous: saved.previous_tag.clone(),
                    skip_on_pop: saved.skip_on_pop,
                    owner: owner.clone(),
                },
            );
        }
    }
}

/// Every node held by the child hosts of `nodes`, at any depth, paired with
/// the container tag of the host holding it. Attached nodes count as well as
/// back-stack entries.
fn nested_nodes(nodes: &[NodeHandle]) -> Vec<(String, NodeTag)> {
    let mut hosts: Vec<HostHandle> = nodes
        .iter()
        .filter_map(|node| node.borrow().child_host())
        .collect();
    let mut visited: Vec<String> = Vec::new();
    let mut nested: Vec<(String, NodeTag)> = Vec::new();

    while let Some(host) = hosts.pop() {
        let host = host.borrow();
        let container = host.container_tag().to_string();
        if visited.contains(&container) {
            continue;
        }
        visited.push(container.clone());

        for node in host.attached_nodes().into_iter().chain(host.back_stack()) {
            let (tag, child_host) = {
                let node = node.borrow();
                (node.tag().clone(), node.child_host())
            };
            if !nested.iter().any(|(_, seen)| *seen == tag) {
                nested.push((container.clone(), tag));
            }
            if let Some(child_host) = child_host {
                hosts.push(child_host);
            }
        }
    }
    nested
}

impl NodeLookup for NavigationController {
    /// Depth-first search over the root host, every nested container host
    /// and the current tab container
    fn find_node(&self, tag: &NodeTag) -> Option<NodeHandle> {
        let mut hosts: Vec<HostHandle> = Vec::new();
        if let Some(container) = self.tabs.current_container() {
            hosts.push(container);
        }
        if let Some(root) = self.active_host() {
            hosts.push(root);
        }

        let mut visited: Vec<String> = Vec::new();
        while let Some(host) = hosts.pop() {
            let host = host.borrow();
            let container = host.container_tag().to_string();
            if visited.contains(&container) {
                continue;
            }
            visited.push(container);

            for node in host.attached_nodes().into_iter().chain(host.back_stack()) {
                if has_tag(&node, tag) {
                    return Some(node);
                }
                let child_host = node.borrow().child_host();
                if let Some(child_host) = child_host {
                    hosts.push(child_host);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{SlotId, StackHost};
    use crate::node::{Node, NodeCore};

    static SCREEN: NodeKind = NodeKind::new("Screen");

    struct Screen {
        core: NodeCore,
    }

    impl Node for Screen {
        fn core(&self) -> &NodeCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut NodeCore {
            &mut self.core
        }
    }

    fn screen() -> NodeHandle {
        Rc::new(RefCell::new(Screen { core: NodeCore::new(&SCREEN) }))
    }

    fn controller_with_host() -> (NavigationController, Rc<RefCell<StackHost>>) {
        let host = Rc::new(RefCell::new(StackHost::new("main_host", SlotId(1))));
        let handle: HostHandle = host.clone();
        let mut controller = NavigationController::new(NavigatorConfig::default());
        controller.attach_host(&handle);
        (controller, host)
    }

    #[test]
    fn test_show_without_host_is_not_ready() {
        let mut controller = NavigationController::new(NavigatorConfig::default());
        let err = controller.try_show(screen(), ShowOptions::new()).unwrap_err();
        assert!(matches!(err, NavError::NotReady { .. }));
    }

    #[test]
    fn test_show_on_paused_host_is_rejected() {
        let (mut controller, host) = controller_with_host();
        host.borrow_mut().lifecycle_mut().on_pause();

        let err = controller.try_show(screen(), ShowOptions::new()).unwrap_err();
        assert_eq!(err, NavError::not_ready("showNode", "main_host"));
        assert_eq!(host.borrow().depth(), 0);
    }

    #[test]
    fn test_invalid_slot_is_rejected() {
        let (mut controller, host) = controller_with_host();
        let err = controller
            .try_show(screen(), ShowOptions::new().in_slot(SlotId(0)))
            .unwrap_err();
        assert!(matches!(err, NavError::InvalidArgument(_)));
        assert_eq!(host.borrow().depth(), 0);
    }

    #[test]
    fn test_pop_to_unknown_tag_is_not_found() {
        let (mut controller, host) = controller_with_host();
        controller.show(screen());
        let handle: HostHandle = host.clone();
        let stranger = NodeTag::generate("Screen");

        let err = controller.try_pop_to_tag(&handle, &stranger).unwrap_err();
        assert!(matches!(err, NavError::NotFound { .. }));
        assert!(!controller.pop_to_tag(&handle, &stranger));
        assert_eq!(host.borrow().depth(), 1);
    }

    #[test]
    fn test_detach_only_clears_matching_host() {
        let (mut controller, _host) = controller_with_host();
        controller.detach_host("other_host");
        assert!(controller.active_host().is_some());
        controller.detach_host("main_host");
        assert!(controller.active_host().is_none());
    }

    #[test]
    fn test_links_pruned_after_pop() {
        let (mut controller, host) = controller_with_host();
        let a = screen();
        let b = screen();
        let a_tag = a.borrow().tag().clone();
        let b_tag = b.borrow().tag().clone();
        controller.show(a);
        controller.show(b);
        assert_eq!(controller.previous_tag(&b_tag), Some(&a_tag));

        let handle: HostHandle = host.clone();
        assert!(controller.pop_to_tag(&handle, &a_tag));
        assert!(controller.back_link(&b_tag).is_none());
        assert!(controller.back_link(&a_tag).is_some());
    }
}
