//! Show, pop and back handling across hosts and tabs

mod back;
mod controller;
mod links;
mod options;

pub use controller::{NavigationController, ShowOutcome};
pub use links::{BackLink, BackLinks};
pub use options::ShowOptions;

use crate::node::{NodeHandle, NodeTag};

/// Resolve a tag to a live node anywhere in the host hierarchy
pub trait NodeLookup {
    fn find_node(&self, tag: &NodeTag) -> Option<NodeHandle>;
}
