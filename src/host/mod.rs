//! Hosts own a physical back-stack of nodes
//!
//! The [`Host`] trait is the contract the rendering container implements.
//! [`StackHost`] is a complete in-memory implementation.

mod lifecycle;
mod stack_host;

pub use lifecycle::HostLifecycle;
pub use stack_host::StackHost;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::node::{NodeHandle, NodeTag};

/// Shared handle to a host
pub type HostHandle = Rc<RefCell<dyn Host>>;

/// Container tag of the application's root host
pub const MAIN_HOST_TAG: &str = "main_host";

/// Identifier of a display slot inside a host. Zero is never a valid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub u32);

impl SlotId {
    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

/// How a pop treats its target entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopMode {
    /// Pop everything above the target; the target stays on top.
    /// With no target, pop only the top entry.
    Exclusive,

    /// Pop the target as well. With no target, pop the whole stack.
    Inclusive,
}

/// Capability contract of a back-stack container.
///
/// The controller only reads readiness; lifecycle signals are the host's own
/// business. Native pops must not touch the model store, the controller runs
/// garbage collection right after every pop it issues.
pub trait Host {
    /// Stable identity of this container
    fn container_tag(&self) -> &str;

    /// True while attached and not saving or restoring state
    fn is_ready(&self) -> bool;

    /// Slot used when a request names none
    fn default_slot(&self) -> SlotId;

    /// Native pop, see [`PopMode`]
    fn pop_back_stack(&mut self, target: Option<&NodeTag>, mode: PopMode);

    /// Native push of `node` under `tag` into `slot`, committed immediately
    fn push_and_commit(&mut self, node: NodeHandle, slot: SlotId, tag: &NodeTag);

    /// Nodes currently attached and visible, back-stack or not
    fn attached_nodes(&self) -> Vec<NodeHandle>;

    /// Back-stack entries, bottom first
    fn back_stack(&self) -> Vec<NodeHandle>;

    /// Node on top of the back-stack
    fn current_node(&self) -> Option<NodeHandle> {
        self.back_stack().last().cloned()
    }

    fn depth(&self) -> usize {
        self.back_stack().len()
    }

    /// Tag of every node this host still references, attached first
    fn live_tags(&self) -> Vec<NodeTag> {
        let mut tags: Vec<NodeTag> = Vec::new();
        for node in self.attached_nodes().into_iter().chain(self.back_stack()) {
            let tag = node.borrow().tag().clone();
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }

    fn find_node(&self, tag: &NodeTag) -> Option<NodeHandle> {
        self.attached_nodes()
            .into_iter()
            .chain(self.back_stack())
            .find(|node| node.borrow().tag() == tag)
    }

    /// Whether `tag` names a back-stack entry
    fn contains(&self, tag: &NodeTag) -> bool {
        self.back_stack()
            .iter()
            .any(|node| node.borrow().tag() == tag)
    }

    /// Leave the application for the system home screen
    fn exit_to_home(&mut self) {}

    /// Put a dialog overlay on screen
    fn present_dialog(&mut self, _tag: &NodeTag) {}

    /// Remove a dialog overlay
    fn remove_dialog(&mut self, _tag: &NodeTag) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_zero_is_invalid() {
        assert!(!SlotId(0).is_valid());
        assert!(SlotId(1).is_valid());
        assert_eq!(SlotId(7).to_string(), "slot#7");
    }
}
