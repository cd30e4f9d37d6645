//! In-memory models scoped to node instances
//!
//! Layout is three levels deep:
//!
//! ```text
//! container tag -> node tag -> key -> value
//! ```
//!
//! Values are held as `serde_json::Value` so any serialisable model can be
//! attached and read back typed. Nothing is written to disk.

mod scope;

pub use scope::ContainerModels;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::host::Host;
use crate::node::NodeTag;

/// Models of a single node, keyed by model name
pub type ModelMap = HashMap<String, Value>;

/// Store of node-scoped models for every container
#[derive(Debug, Default)]
pub struct ModelStore {
    containers: HashMap<String, ContainerModels>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach one model. Dropped when the node has no owner yet.
    pub fn attach(&mut self, owner: Option<&str>, tag: &NodeTag, key: impl Into<String>, value: Value) {
        let Some(owner) = owner else {
            debug!("attach model for {} dropped: node not shown yet", tag);
            return;
        };
        self.containers
            .entry(owner.to_string())
            .or_default()
            .insert(tag, key.into(), value);
    }

    /// Attach a serialisable model
    pub fn attach_serialized<T: Serialize>(
        &mut self,
        owner: Option<&str>,
        tag: &NodeTag,
        key: impl Into<String>,
        model: &T,
    ) {
        let key = key.into();
        match serde_json::to_value(model) {
            Ok(value) => self.attach(owner, tag, key, value),
            Err(e) => warn!("Failed to serialize model '{}' for {}: {}", key, tag, e),
        }
    }

    /// Attach every model of `models`, merging with what is already stored
    pub fn attach_all(&mut self, owner: Option<&str>, tag: &NodeTag, models: ModelMap) {
        let Some(owner) = owner else {
            debug!("attach_all for {} dropped: node not shown yet", tag);
            return;
        };
        if models.is_empty() {
            return;
        }
        self.containers
            .entry(owner.to_string())
            .or_default()
            .insert_all(tag, models);
    }

    pub fn get(&self, owner: Option<&str>, tag: &NodeTag, key: &str) -> Option<&Value> {
        self.containers.get(owner?)?.get(tag, key)
    }

    /// Read a model back as `T`
    pub fn get_as<T: DeserializeOwned>(&self, owner: Option<&str>, tag: &NodeTag, key: &str) -> Option<T> {
        let value = self.get(owner, tag, key)?;
        match serde_json::from_value(value.clone()) {
            Ok(model) => Some(model),
            Err(e) => {
                warn!("Model '{}' for {} has an unexpected shape: {}", key, tag, e);
                None
            }
        }
    }

    /// Whether any model is stored for the node
    pub fn contains_node(&self, owner: &str, tag: &NodeTag) -> bool {
        self.containers
            .get(owner)
            .map(|models| models.contains(tag))
            .unwrap_or(false)
    }

    /// Drop models of every node `host` no longer references.
    ///
    /// The retained set is the union of the host's attached nodes and its
    /// back-stack entries. Returns the tags whose models were dropped.
    pub fn garbage_collect(&mut self, host: &dyn Host) -> Vec<NodeTag> {
        let container = host.container_tag().to_string();
        let Some(models) = self.containers.get_mut(&container) else {
            return Vec::new();
        };

        debug!("cleanUp models for {}: before size {}", container, models.len());
        let retained = host.live_tags();
        let dropped = models.retain_only(&retained);
        debug!("cleanUp models for {}: after size {}", container, models.len());

        if models.is_empty() {
            self.containers.remove(&container);
        }
        dropped
    }

    /// Remove one node's models from its container scope
    pub fn remove_node(&mut self, owner: &str, tag: &NodeTag) {
        if let Some(models) = self.containers.get_mut(owner) {
            models.remove(tag);
            if models.is_empty() {
                self.containers.remove(owner);
            }
        }
    }

    /// Drop a whole container scope, returning the node tags it held
    pub fn drop_scope(&mut self, container: &str) -> Vec<NodeTag> {
        self.containers
            .remove(container)
            .map(|models| models.tags())
            .unwrap_or_default()
    }

    /// Number of nodes with stored models, across all containers
    pub fn len(&self) -> usize {
        self.containers.values().map(ContainerModels::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{PopMode, SlotId, StackHost};
    use crate::node::{Node, NodeCore, NodeHandle, NodeKind};
    use serde::Deserialize;
    use serde_json::json;
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

    fn push(host: &mut StackHost) -> NodeTag {
        let node: NodeHandle = Rc::new(RefCell::new(Screen { core: NodeCore::new(&SCREEN) }));
        let tag = node.borrow().tag().clone();
        host.push_and_commit(node, SlotId(1), &tag);
        tag
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Filter {
        query: String,
        page: u32,
    }

    #[test]
    fn test_attach_without_owner_is_dropped() {
        let mut store = ModelStore::new();
        let tag = NodeTag::generate("Screen");
        store.attach(None, &tag, "k", json!(1));
        assert!(store.is_empty());
        assert_eq!(store.get(None, &tag, "k"), None);
    }

    #[test]
    fn test_typed_roundtrip() {
        let mut store = ModelStore::new();
        let tag = NodeTag::generate("Screen");
        let filter = Filter { query: "rust".to_string(), page: 2 };
        store.attach_serialized(Some("main_host"), &tag, "filter", &filter);

        let back: Option<Filter> = store.get_as(Some("main_host"), &tag, "filter");
        assert_eq!(back, Some(filter));

        let wrong: Option<u32> = store.get_as(Some("main_host"), &tag, "filter");
        assert_eq!(wrong, None);
    }

    #[test]
    fn test_attach_all_merges() {
        let mut store = ModelStore::new();
        let tag = NodeTag::generate("Screen");
        store.attach(Some("main_host"), &tag, "a", json!(1));

        let mut more = ModelMap::new();
        more.insert("b".to_string(), json!(2));
        store.attach_all(Some("main_host"), &tag, more);

        assert_eq!(store.get(Some("main_host"), &tag, "a"), Some(&json!(1)));
        assert_eq!(store.get(Some("main_host"), &tag, "b"), Some(&json!(2)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_garbage_collect_keeps_live_nodes() {
        let mut host = StackHost::new("main_host", SlotId(1));
        let a = push(&mut host);
        let b = push(&mut host);
        let c = push(&mut host);

        let mut store = ModelStore::new();
        for tag in [&a, &b, &c] {
            store.attach(Some("main_host"), tag, "k", json!(tag.as_str()));
        }

        host.pop_back_stack(Some(&a), PopMode::Exclusive);
        let dropped = store.garbage_collect(&host);

        assert_eq!(dropped.len(), 2);
        assert!(store.contains_node("main_host", &a));
        assert!(!store.contains_node("main_host", &b));
        assert!(!store.contains_node("main_host", &c));
    }

    #[test]
    fn test_garbage_collect_other_container_untouched() {
        let host = StackHost::new("main_host", SlotId(1));
        let mut store = ModelStore::new();
        let tag = NodeTag::generate("Screen");
        store.attach(Some("tab_0"), &tag, "k", json!(true));

        assert!(store.garbage_collect(&host).is_empty());
        assert!(store.contains_node("tab_0", &tag));
    }

    #[test]
    fn test_drop_scope() {
        let mut store = ModelStore::new();
        let tag = NodeTag::generate("Screen");
        store.attach(Some("container"), &tag, "k", json!(1));
        assert_eq!(store.drop_scope("container"), vec![tag]);
        assert!(store.is_empty());
    }

}
