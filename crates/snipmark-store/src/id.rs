//! Snippet identifiers.
//!
//! ## Learning: Newtypes
//!
//! `SnippetId` wraps a `String` so an arbitrary string can't be passed where
//! an id is expected, and so blank ids are rejected once, at construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Short opaque identifier for a stored snippet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetId(String);

impl SnippetId {
    /// Wraps an existing id. Returns `None` for blank input.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == id.len() {
            Some(Self(id))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Generates a random id of `length` hex characters (clamped to 1..=32).
    pub fn generate(length: usize) -> Self {
        let mut hex = Uuid::new_v4().simple().to_string();
        hex.truncate(length.clamp(1, 32));
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SnippetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SnippetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length() {
        assert_eq!(SnippetId::generate(8).as_str().len(), 8);
        assert_eq!(SnippetId::generate(0).as_str().len(), 1);
        assert_eq!(SnippetId::generate(100).as_str().len(), 32);
        assert!(SnippetId::generate(8).as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_blank_ids_rejected() {
        assert!(SnippetId::new("").is_none());
        assert!(SnippetId::new("  ").is_none());
        assert_eq!(SnippetId::new(" ab12 ").unwrap().as_str(), "ab12");
    }
}
