//! Deterministic ID generation using SHA256 hashing.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A deterministic entity ID derived from content hash.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Generate an EntityId from input fields.
    /// Uses SHA256 and takes the first 16 characters for brevity.
    pub fn generate(fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(field.as_bytes());
        }
        let hash = hex::encode(hasher.finalize());
        Self(hash[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifies one player's entry in one event.
pub type RecordId = EntityId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_is_deterministic() {
        let a = EntityId::generate(&["2024-03-02", "Spring Open", "Alice"]);
        let b = EntityId::generate(&["2024-03-02", "Spring Open", "Alice"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_record_id_separates_fields() {
        // "ab|c" and "a|bc" must not collide
        let a = EntityId::generate(&["ab", "c"]);
        let b = EntityId::generate(&["a", "bc"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_record_id_shape() {
        let id = EntityId::generate(&["2024-03-02", "Spring Open", "Bob"]);
        assert_eq!(id.as_str().len(), 16);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_record_id_display_and_debug() {
        let id = EntityId::from("0011aabb");
        assert_eq!(id.to_string(), "0011aabb");
        assert_eq!(format!("{:?}", id), "EntityId(0011aabb)");
    }
}
