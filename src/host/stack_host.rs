use log::debug;

use super::{Host, HostLifecycle, PopMode, SlotId};
use crate::node::{has_tag, NodeHandle, NodeTag};

struct StackEntry {
    tag: NodeTag,
    slot: SlotId,
    node: NodeHandle,
}

/// In-memory host with a real back-stack.
///
/// Besides the back-stack it keeps a list of nodes that are attached without
/// a back-stack entry (for example the per-tab containers of a tab widget).
pub struct StackHost {
    container_tag: String,
    default_slot: SlotId,
    lifecycle: HostLifecycle,
    entries: Vec<StackEntry>,
    attached: Vec<NodeHandle>,
    dialogs: Vec<NodeTag>,
    exit_requests: usize,
}

impl StackHost {
    /// Create a host that is already attached and ready
    pub fn new(container_tag: impl Into<String>, default_slot: SlotId) -> Self {
        Self {
            container_tag: container_tag.into(),
            default_slot,
            lifecycle: HostLifecycle::ready(),
            entries: Vec::new(),
            attached: Vec::new(),
            dialogs: Vec::new(),
            exit_requests: 0,
        }
    }

    pub fn lifecycle(&self) -> &HostLifecycle {
        &self.lifecycle
    }

    pub fn lifecycle_mut(&mut self) -> &mut HostLifecycle {
        &mut self.lifecycle
    }

    /// Attach a node outside of the back-stack
    pub fn attach(&mut self, node: NodeHandle) {
        let tag = node.borrow().tag().clone();
        if self.attached.iter().any(|n| has_tag(n, &tag)) {
            return;
        }
        self.attached.push(node);
    }

    pub fn detach(&mut self, tag: &NodeTag) {
        self.attached.retain(|n| !has_tag(n, tag));
    }

    /// Back-stack tags, bottom first
    pub fn tags(&self) -> Vec<NodeTag> {
        self.entries.iter().map(|e| e.tag.clone()).collect()
    }

    /// Slot the entry for `tag` was pushed into
    pub fn slot_of(&self, tag: &NodeTag) -> Option<SlotId> {
        self.entries.iter().find(|e| &e.tag == tag).map(|e| e.slot)
    }

    /// Number of times this host was asked to leave for the system home
    pub fn exit_requests(&self) -> usize {
        self.exit_requests
    }

    /// Dialogs currently presented
    pub fn dialogs(&self) -> &[NodeTag] {
        &self.dialogs
    }

    fn position_of(&self, tag: &NodeTag) -> Option<usize> {
        self.entries.iter().rposition(|e| &e.tag == tag)
    }
}

impl Host for StackHost {
    fn container_tag(&self) -> &str {
        &self.container_tag
    }

    fn is_ready(&self) -> bool {
        self.lifecycle.is_ready()
    }

    fn default_slot(&self) -> SlotId {
        self.default_slot
    }

    fn pop_back_stack(&mut self, target: Option<&NodeTag>, mode: PopMode) {
        let keep = match (target, mode) {
            (None, PopMode::Inclusive) => 0,
            (None, PopMode::Exclusive) => self.entries.len().saturating_sub(1),
            (Some(tag), mode) => match self.position_of(tag) {
                Some(index) if mode == PopMode::Inclusive => index,
                Some(index) => index + 1,
                None => {
                    debug!(
                        "{}: pop target {} not in back stack, nothing popped",
                        self.container_tag, tag
                    );
                    return;
                }
            },
        };

        let popped = self.entries.len().saturating_sub(keep);
        self.entries.truncate(keep);
        debug!(
            "{}: popped {} entries, depth now {}",
            self.container_tag,
            popped,
            self.entries.len()
        );
    }

    fn push_and_commit(&mut self, node: NodeHandle, slot: SlotId, tag: &NodeTag) {
        self.entries.push(StackEntry {
            tag: tag.clone(),
            slot,
            node,
        });
        debug!(
            "{}: pushed {} into {}, depth now {}",
            self.container_tag,
            tag,
            slot,
            self.entries.len()
        );
    }

    fn attached_nodes(&self) -> Vec<NodeHandle> {
        let mut nodes = self.attached.clone();
        if let Some(top) = self.entries.last() {
            nodes.push(top.node.clone());
        }
        nodes
    }

    fn back_stack(&self) -> Vec<NodeHandle> {
        self.entries.iter().map(|e| e.node.clone()).collect()
    }

    fn current_node(&self) -> Option<NodeHandle> {
        self.entries.last().map(|e| e.node.clone())
    }

    fn depth(&self) -> usize {
        self.entries.len()
    }

    fn contains(&self, tag: &NodeTag) -> bool {
        self.position_of(tag).is_some()
    }

    fn exit_to_home(&mut self) {
        self.exit_requests += 1;
        debug!("{}: exit to home requested", self.container_tag);
    }

    fn present_dialog(&mut self, tag: &NodeTag) {
        if !self.dialogs.contains(tag) {
            self.dialogs.push(tag.clone());
        }
    }

    fn remove_dialog(&mut self, tag: &NodeTag) {
        self.dialogs.retain(|d| d != tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeCore, NodeKind};
    use std::cell::RefCell;
    use std::rc::Rc;

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

    fn host_with(count: usize) -> (StackHost, Vec<NodeTag>) {
        let mut host = StackHost::new("test_host", SlotId(1));
        let mut tags = Vec::new();
        for _ in 0..count {
            let node = screen();
            let tag = node.borrow().tag().clone();
            host.push_and_commit(node, SlotId(1), &tag);
            tags.push(tag);
        }
        (host, tags)
    }

    #[test]
    fn test_pop_exclusive_keeps_target() {
        let (mut host, tags) = host_with(4);
        host.pop_back_stack(Some(&tags[1]), PopMode::Exclusive);
        assert_eq!(host.tags(), tags[..2].to_vec());
    }

    #[test]
    fn test_pop_inclusive_removes_target() {
        let (mut host, tags) = host_with(4);
        host.pop_back_stack(Some(&tags[1]), PopMode::Inclusive);
        assert_eq!(host.tags(), tags[..1].to_vec());
    }

    #[test]
    fn test_pop_without_target() {
        let (mut host, tags) = host_with(3);
        host.pop_back_stack(None, PopMode::Exclusive);
        assert_eq!(host.tags(), tags[..2].to_vec());

        host.pop_back_stack(None, PopMode::Inclusive);
        assert_eq!(host.depth(), 0);
        assert!(host.current_node().is_none());
    }

    #[test]
    fn test_pop_unknown_target_is_noop() {
        let (mut host, _) = host_with(2);
        let stranger = NodeTag::generate("Screen");
        host.pop_back_stack(Some(&stranger), PopMode::Inclusive);
        assert_eq!(host.depth(), 2);
    }

    #[test]
    fn test_attached_nodes_include_top_and_extras() {
        let (mut host, tags) = host_with(2);
        let extra = screen();
        let extra_tag = extra.borrow().tag().clone();
        host.attach(extra.clone());
        host.attach(extra);

        let live = host.live_tags();
        assert_eq!(live.len(), 3);
        assert!(live.contains(&extra_tag));
        assert!(host.find_node(&extra_tag).is_some());
        assert!(!host.contains(&extra_tag));
        assert!(host.contains(&tags[0]));

        host.detach(&extra_tag);
        assert!(host.find_node(&extra_tag).is_none());
    }
}
