//! Tag models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Deterministic tag document ID, derived from the tag name.
///
/// Two pipelines resolving the same name always target the same document,
/// so find-or-create collapses into a single idempotent upsert. The name
/// bytes are hex-encoded to stay inside the document-id charset while
/// keeping the mapping case-sensitive and collision-free.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct TagId(pub String);

impl TagId {
    /// Derive the document ID for a tag name.
    pub fn from_name(name: &str) -> Self {
        let mut encoded = String::with_capacity(name.len() * 2);
        for byte in name.as_bytes() {
            encoded.push_str(&format!("{:02x}", byte));
        }
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared label attached to media items.
///
/// Created lazily during metadata persistence and never deleted by the
/// pipeline; many items may reference the same tag.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

impl Tag {
    /// Create a tag record for a name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: TagId::from_name(&name),
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_id_is_deterministic() {
        assert_eq!(TagId::from_name("rust"), TagId::from_name("rust"));
    }

    #[test]
    fn test_tag_id_is_case_sensitive() {
        assert_ne!(TagId::from_name("Rust"), TagId::from_name("rust"));
    }

    #[test]
    fn test_tag_id_charset() {
        let id = TagId::from_name("machine learning!");
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
