//! Memory store data types.

use serde::{Deserialize, Serialize};

/// Maximum number of facts kept in the memory store.
pub const MEMORY_CAPACITY: usize = 100;

/// Tag attached to every fact produced by automatic extraction.
pub const AUTO_EXTRACTED_TAG: &str = "auto-extracted";

/// A single durable fact learned from a research session.
///
/// Serialized with camelCase field names; this is also the on-disk record
/// format inside the memory slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryItem {
    /// Unique identifier (UUID v4), never reused.
    pub id: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// The fact text. Never empty.
    pub content: String,
    /// Classification labels.
    #[serde(default)]
    pub tags: Vec<String>,
    /// The query that produced this fact.
    pub source: String,
}

impl MemoryItem {
    /// Build an automatically extracted fact stamped with the given time.
    pub fn extracted(content: impl Into<String>, source: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            content: content.into(),
            tags: vec![AUTO_EXTRACTED_TAG.to_string()],
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracted_item_has_auto_tag() {
        let item = MemoryItem::extracted("Water boils at 100C", "boiling point", 42);
        assert_eq!(item.tags, vec!["auto-extracted".to_string()]);
        assert_eq!(item.source, "boiling point");
        assert_eq!(item.timestamp, 42);
        assert!(!item.id.is_empty());
    }

    #[test]
    fn test_extracted_ids_are_unique() {
        let a = MemoryItem::extracted("a", "q", 0);
        let b = MemoryItem::extracted("a", "q", 0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serializes_camel_case_record() {
        let item = MemoryItem {
            id: "abc".to_string(),
            timestamp: 1_700_000_000_000,
            content: "fact".to_string(),
            tags: vec![AUTO_EXTRACTED_TAG.to_string()],
            source: "query".to_string(),
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"timestamp\":1700000000000"));
        assert!(json.contains("\"tags\":[\"auto-extracted\"]"));
    }

    #[test]
    fn test_missing_tags_default_to_empty() {
        let json = r#"{"id":"x","timestamp":1,"content":"c","source":"s"}"#;
        let item: MemoryItem = serde_json::from_str(json).unwrap();
        assert!(item.tags.is_empty());
    }
}
