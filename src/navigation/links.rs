use std::collections::HashMap;

use crate::node::NodeTag;

/// Back-navigation state of one shown node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackLink {
    /// Where a back press from this node goes
    pub previous: Option<NodeTag>,

    /// Back presses landing here continue to `previous`
    pub skip_on_pop: bool,

    /// Container tag of the host holding the node
    pub owner: String,
}

/// Side-table of back-links, keyed by node tag.
///
/// Kept apart from the hosts' physical stacks: singleton re-pointing and
/// skip-on-pop make the two diverge.
#[derive(Debug, Default)]
pub struct BackLinks {
    links: HashMap<NodeTag, BackLink>,
}

impl BackLinks {
    pub fn insert(&mut self, tag: NodeTag, link: BackLink) {
        self.links.insert(tag, link);
    }

    pub fn get(&self, tag: &NodeTag) -> Option<&BackLink> {
        self.links.get(tag)
    }

    pub fn remove(&mut self, tag: &NodeTag) -> Option<BackLink> {
        self.links.remove(tag)
    }

    pub fn previous_of(&self, tag: &NodeTag) -> Option<&NodeTag> {
        self.links.get(tag)?.previous.as_ref()
    }

    /// Tags of every node owned by `container`
    pub fn owned_by(&self, container: &str) -> Vec<NodeTag> {
        let mut tags: Vec<NodeTag> = self
            .links
            .iter()
            .filter(|(_, link)| link.owner == container)
            .map(|(tag, _)| tag.clone())
            .collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(previous: Option<&NodeTag>, owner: &str) -> BackLink {
        BackLink {
            previous: previous.cloned(),
            skip_on_pop: false,
            owner: owner.to_string(),
        }
    }

    #[test]
    fn test_owned_by_filters_container() {
        let a = NodeTag::generate("A");
        let b = NodeTag::generate("B");
        let c = NodeTag::generate("C");

        let mut links = BackLinks::default();
        links.insert(a.clone(), link(None, "main_host"));
        links.insert(b.clone(), link(Some(&a), "main_host"));
        links.insert(c.clone(), link(None, "tab_0"));

        let owned = links.owned_by("main_host");
        assert_eq!(owned.len(), 2);
        assert!(owned.contains(&a) && owned.contains(&b));
        assert_eq!(links.previous_of(&b), Some(&a));
        assert_eq!(links.previous_of(&a), None);

        links.remove(&b);
        assert_eq!(links.len(), 2);
    }
}
