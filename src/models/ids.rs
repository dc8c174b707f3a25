//! Deterministic record IDs derived from content hashes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A deterministic record ID derived from a content hash.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a RecordId from the identifying fields of a record.
    /// Uses SHA256 and keeps the first 16 hex characters.
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

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

/// Type alias for match record IDs
pub type MatchId = RecordId;

/// Type alias for ranking record IDs
pub type RankingId = RecordId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_deterministic() {
        let a = RecordId::generate(&["2024-01-13", "CN Paris", "U20", "Poule 3", "A", "B"]);
        let b = RecordId::generate(&["2024-01-13", "CN Paris", "U20", "Poule 3", "A", "B"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_record_id_field_boundaries_matter() {
        // The separator keeps ("ab", "c") distinct from ("a", "bc").
        let a = RecordId::generate(&["ab", "c"]);
        let b = RecordId::generate(&["a", "bc"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_record_id_hex_prefix() {
        let id = RecordId::generate(&["x"]);
        assert_eq!(id.as_str().len(), 16);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert!(format!("{:?}", id).starts_with("RecordId("));
    }
}
