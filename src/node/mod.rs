//! Screen instances managed by the navigation controller
//!
//! A node is identified by its [`NodeTag`] and described by a static
//! [`NodeKind`]. Back-links, skip flags and ownership are not stored on the
//! node: the controller keeps them in a side-table keyed by tag, because the
//! back-link graph is allowed to diverge from physical stack order.
//!
//! A container node is a node that also owns a [`Host`](crate::host::Host),
//! exposed through [`Node::child_host`].

mod kind;
mod tag;

pub use kind::{NodeKind, TabAffinity};
pub use tag::NodeTag;

use log::warn;
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::host::HostHandle;
use crate::models::ModelMap;

/// Shared handle to a node. Navigation runs on a single thread.
pub type NodeHandle = Rc<RefCell<dyn Node>>;

/// Capability contract every screen type implements.
///
/// Only `core`/`core_mut` are required; the hooks default to "not handled".
pub trait Node {
    fn core(&self) -> &NodeCore;

    fn core_mut(&mut self) -> &mut NodeCore;

    /// Give the node a chance to consume a back press
    fn on_back_intercept(&mut self) -> bool {
        false
    }

    /// Called when the tab holding this node is tapped again
    fn on_tab_clicked(&mut self) -> bool {
        false
    }

    /// Result delivered by a dismissed dialog that targeted this node
    fn on_dialog_result(&mut self, _request_code: i32, _result_code: i32, _data: &ModelMap) {}

    /// The host this node owns, if it acts as a container
    fn child_host(&self) -> Option<HostHandle> {
        None
    }

    fn tag(&self) -> &NodeTag {
        self.core().tag()
    }

    fn kind(&self) -> &'static NodeKind {
        self.core().kind()
    }
}

/// Identity and pre-push state embedded in every node.
#[derive(Debug)]
pub struct NodeCore {
    kind: &'static NodeKind,
    tag: OnceCell<NodeTag>,
    root_child_tag: Option<NodeTag>,
    arguments: ModelMap,
}

impl NodeCore {
    pub fn new(kind: &'static NodeKind) -> Self {
        Self {
            kind,
            tag: OnceCell::new(),
            root_child_tag: None,
            arguments: ModelMap::new(),
        }
    }

    pub fn kind(&self) -> &'static NodeKind {
        self.kind
    }

    /// Tag of this instance, generated on first use and stable afterwards
    pub fn tag(&self) -> &NodeTag {
        self.tag.get_or_init(|| NodeTag::generate(self.kind.name))
    }

    /// Tag of the initial child when this node is a container
    pub fn root_child_tag(&self) -> Option<&NodeTag> {
        self.root_child_tag.as_ref()
    }

    pub(crate) fn set_root_child_tag(&mut self, tag: Option<NodeTag>) {
        self.root_child_tag = tag;
    }

    pub(crate) fn restore_tag(&mut self, tag: NodeTag) {
        self.tag = OnceCell::from(tag);
    }

    /// Attach a model before the node is shown. It is moved into the model
    /// store under the node's tag when the node is pushed.
    pub fn add_argument<T: Serialize>(&mut self, key: impl Into<String>, value: &T) {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(value) => {
                self.arguments.insert(key, value);
            }
            Err(e) => warn!("Dropping argument '{}' for {}: {}", key, self.tag(), e),
        }
    }

    pub fn arguments(&self) -> &ModelMap {
        &self.arguments
    }

    pub(crate) fn take_arguments(&mut self) -> ModelMap {
        std::mem::take(&mut self.arguments)
    }
}

/// Navigation state of a node, in the shape it is persisted across a host
/// save/restore cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedNode {
    pub tag: NodeTag,
    pub previous_tag: Option<NodeTag>,
    pub skip_on_pop: bool,
    pub owner_container_tag: Option<String>,
    pub root_child_tag: Option<NodeTag>,
}

impl SavedNode {
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        use anyhow::Context;
        serde_json::from_str(raw).context("Failed to parse saved node state")
    }
}

/// Compare two handles by tag
pub(crate) fn has_tag(node: &NodeHandle, tag: &NodeTag) -> bool {
    node.borrow().tag() == tag
}
