use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub(crate) const TAG_SEPARATOR: char = ':';

/// Stable identity of a node or dialog instance.
///
/// Format is `"<kind-name>:<discriminator>"`. The discriminator is generated
/// once and carried through save/restore, never re-derived from a runtime
/// address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeTag(String);

impl NodeTag {
    /// Generate a fresh tag for an instance of `kind_name`
    pub fn generate(kind_name: &str) -> Self {
        NodeTag(format!(
            "{}{}{}",
            kind_name,
            TAG_SEPARATOR,
            Uuid::new_v4().simple()
        ))
    }

    /// Build a tag from known parts
    pub fn from_parts(kind_name: &str, discriminator: &str) -> Result<Self> {
        Self::parse(&format!("{}{}{}", kind_name, TAG_SEPARATOR, discriminator))
    }

    /// Parse and validate a tag string
    pub fn parse(raw: &str) -> Result<Self> {
        let (kind, discriminator) = raw
            .split_once(TAG_SEPARATOR)
            .with_context(|| format!("Tag '{}' is missing the '{}' separator", raw, TAG_SEPARATOR))?;

        if kind.is_empty() {
            anyhow::bail!("Tag '{}' has an empty kind name", raw);
        }
        if discriminator.is_empty() || discriminator.contains(TAG_SEPARATOR) {
            anyhow::bail!("Tag '{}' has an invalid discriminator", raw);
        }

        Ok(NodeTag(raw.to_string()))
    }

    pub fn kind_name(&self) -> &str {
        self.0
            .split_once(TAG_SEPARATOR)
            .map(|(kind, _)| kind)
            .unwrap_or(&self.0)
    }

    pub fn discriminator(&self) -> &str {
        self.0
            .split_once(TAG_SEPARATOR)
            .map(|(_, discriminator)| discriminator)
            .unwrap_or("")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NodeTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NodeTag {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<NodeTag> for String {
    fn from(tag: NodeTag) -> Self {
        tag.0
    }
}

impl AsRef<str> for NodeTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeTag {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
