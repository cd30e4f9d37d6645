use super::tag::TAG_SEPARATOR;

/// Which tab a node kind prefers to be shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabAffinity {
    /// Show in whatever tab is current
    Any,

    /// Show in the tab at this index
    Tab(usize),
}

/// Capability descriptor shared by every instance of a node kind.
///
/// Declared once per kind as a `static`/`const` and resolved when the node
/// is constructed:
///
/// ```rust
/// use stacknav::{NodeKind, TabAffinity};
///
/// static SETTINGS: NodeKind = NodeKind::new("Settings")
///     .single_instance()
///     .with_tab_affinity(TabAffinity::Tab(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeKind {
    /// Kind name, also the prefix of every instance tag
    pub name: &'static str,

    /// At most one live instance of this kind may exist in a host. Hosts
    /// are checked one at a time, so nested hosts may each hold one.
    pub single_instance: bool,

    /// Preferred tab, if this kind is tab-scoped at all
    pub tab_affinity: Option<TabAffinity>,
}

impl NodeKind {
    /// Panics when `name` is empty or contains the tag separator `':'`,
    /// which would make instance tags unparseable. In a `static` this is a
    /// compile error.
    pub const fn new(name: &'static str) -> Self {
        assert!(is_valid_kind_name(name), "kind name must be non-empty and free of ':'");
        Self {
            name,
            single_instance: false,
            tab_affinity: None,
        }
    }

    pub const fn single_instance(mut self) -> Self {
        self.single_instance = true;
        self
    }

    pub const fn with_tab_affinity(mut self, affinity: TabAffinity) -> Self {
        self.tab_affinity = Some(affinity);
        self
    }

    /// Two kinds are the same kind when their names match
    pub fn is_same_kind(&self, other: &NodeKind) -> bool {
        self.name == other.name
    }
}

const fn is_valid_kind_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == TAG_SEPARATOR as u8 {
            return false;
        }
        i += 1;
    }
    true
}
