use serde_json::Value;
use std::collections::HashMap;

use super::ModelMap;
use crate::node::NodeTag;

/// Models of every node owned by one container
#[derive(Debug, Default)]
pub struct ContainerModels {
    models: HashMap<NodeTag, ModelMap>,
}

impl ContainerModels {
    pub fn insert(&mut self, tag: &NodeTag, key: String, value: Value) {
        self.models.entry(tag.clone()).or_default().insert(key, value);
    }

    pub fn insert_all(&mut self, tag: &NodeTag, models: ModelMap) {
        self.models.entry(tag.clone()).or_default().extend(models);
    }

    pub fn get(&self, tag: &NodeTag, key: &str) -> Option<&Value> {
        self.models.get(tag)?.get(key)
    }

    pub fn contains(&self, tag: &NodeTag) -> bool {
        self.models.contains_key(tag)
    }

    pub fn remove(&mut self, tag: &NodeTag) -> Option<ModelMap> {
        self.models.remove(tag)
    }

    /// Keep only the listed nodes, returning the tags that were dropped
    pub fn retain_only(&mut self, retained: &[NodeTag]) -> Vec<NodeTag> {
        if self.models.is_empty() {
            return Vec::new();
        }

        let mut dropped = Vec::new();
        self.models.retain(|tag, _| {
            let keep = retained.contains(tag);
            if !keep {
                dropped.push(tag.clone());
            }
            keep
        });
        dropped.sort();
        dropped
    }

    pub fn tags(&self) -> Vec<NodeTag> {
        let mut tags: Vec<NodeTag> = self.models.keys().cloned().collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
