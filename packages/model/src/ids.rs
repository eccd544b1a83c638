use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a block. Assigned once by the factory and kept across moves.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

/// Identity of a column inside a `columns` block.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id!(BlockId);
string_id!(ColumnId);

/// Source of fresh, never-reused identifiers.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs. The default for interactive editing.
#[derive(Debug, Default, Clone)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Generate a stable document seed from a file path using CRC32
pub fn document_seed(path: &str) -> String {
    let mut buff = String::from(path);
    if !path.starts_with("file://") {
        buff = format!("file://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ids of the form `{seed}-{n}`.
///
/// Deterministic, so scripted sessions and tests produce reproducible
/// documents. Uniqueness only holds within one seed, so callers editing an
/// existing document must start the counter past any id already in use
/// (see [`SequentialIdGenerator::starting_after`]).
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    seed: String,
    count: u64,
}

impl SequentialIdGenerator {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Seed derived from the document path
    pub fn for_document(path: &str) -> Self {
        Self::new(document_seed(path))
    }

    /// Resume numbering after the highest `{seed}-{n}` among `existing`.
    pub fn starting_after<'a>(
        seed: impl Into<String>,
        existing: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let seed = seed.into();
        let prefix = format!("{}-", seed);
        let count = existing
            .into_iter()
            .filter_map(|id| id.strip_prefix(&prefix))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        Self { seed, count }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_seed_is_stable() {
        let id1 = document_seed("/newsletter.json");
        let id2 = document_seed("/newsletter.json");
        assert_eq!(id1, id2);

        let id3 = document_seed("/other.json");
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = SequentialIdGenerator::new("doc");

        assert_eq!(gen.next_id(), "doc-1");
        assert_eq!(gen.next_id(), "doc-2");
        assert_eq!(gen.next_id(), "doc-3");
        assert_eq!(gen.seed(), "doc");
    }

    #[test]
    fn test_sequential_resumes_past_existing_ids() {
        let existing = ["doc-4", "doc-12", "other-99", "doc-x"];
        let mut gen = SequentialIdGenerator::starting_after("doc", existing);

        assert_eq!(gen.next_id(), "doc-13");
    }

    #[test]
    fn test_uuid_ids_do_not_repeat() {
        let mut gen = UuidGenerator;
        let ids: std::collections::HashSet<_> = (0..100).map(|_| gen.next_id()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = BlockId::new("b-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"b-1\"");
        assert_eq!(id, "b-1");
    }
}
