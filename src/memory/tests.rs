//! Tests for the memory store.

use super::*;
use crate::memory_types::{AUTO_EXTRACTED_TAG, MEMORY_CAPACITY};
use crate::slots::{InMemorySlots, SlotStore};
use crate::sqlite::Database;
use proptest::prelude::*;

fn facts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn contents(store: &MemoryStore<InMemorySlots>) -> Vec<String> {
    store
        .load()
        .unwrap()
        .into_iter()
        .map(|m| m.content)
        .collect()
}

#[test]
fn test_load_empty_store() {
    let store = MemoryStore::new(InMemorySlots::new());
    assert!(store.load().unwrap().is_empty());
    assert!(store.is_empty().unwrap());
}

#[test]
fn test_append_orders_most_recent_first() {
    let store = MemoryStore::new(InMemorySlots::new());
    store.append(&facts(&["A", "B"]), "q1").unwrap();
    store.append(&facts(&["C"]), "q2").unwrap();

    assert_eq!(contents(&store), vec!["C", "A", "B"]);
}

#[test]
fn test_append_sets_source_and_tag() {
    let store = MemoryStore::new(InMemorySlots::new());
    let items = store.append(&facts(&["fact"]), "what is a fact").unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].source, "what is a fact");
    assert_eq!(items[0].tags, vec![AUTO_EXTRACTED_TAG.to_string()]);
    assert!(items[0].timestamp > 0);
}

#[test]
fn test_append_returns_persisted_state() {
    let store = MemoryStore::new(InMemorySlots::new());
    store.append(&facts(&["old"]), "q1").unwrap();
    let returned = store.append(&facts(&["new"]), "q2").unwrap();

    assert_eq!(returned, store.load().unwrap());
}

#[test]
fn test_append_truncates_to_capacity() {
    let store = MemoryStore::new(InMemorySlots::new());
    let first: Vec<String> = (0..MEMORY_CAPACITY).map(|i| format!("old {i}")).collect();
    store.append(&first, "bulk").unwrap();

    let items = store.append(&facts(&["newest"]), "q").unwrap();

    assert_eq!(items.len(), MEMORY_CAPACITY);
    assert_eq!(items[0].content, "newest");
    assert_eq!(items[1].content, "old 0");
    assert_eq!(items.last().unwrap().content, format!("old {}", MEMORY_CAPACITY - 2));
}

#[test]
fn test_append_empty_facts_keeps_collection() {
    let store = MemoryStore::new(InMemorySlots::new());
    store.append(&facts(&["A"]), "q").unwrap();
    store.append(&[], "q2").unwrap();
    assert_eq!(contents(&store), vec!["A"]);
}

#[test]
fn test_append_skips_blank_facts() {
    let store = MemoryStore::new(InMemorySlots::new());
    let items = store
        .append(&facts(&["", "kept", "   ", "\t\n"]), "q")
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(contents(&store), vec!["kept"]);
}

#[test]
fn test_clear_then_load_is_empty() {
    let store = MemoryStore::new(InMemorySlots::new());
    store.append(&facts(&["A", "B"]), "q").unwrap();
    store.clear().unwrap();

    assert!(store.load().unwrap().is_empty());
    assert_eq!(store.slots().read(MEMORY_SLOT).unwrap(), None);
}

#[test]
fn test_corrupt_payload_loads_empty() {
    let slots = InMemorySlots::new();
    slots.write(MEMORY_SLOT, "{this is not json").unwrap();
    let store = MemoryStore::new(slots);

    assert!(store.load().unwrap().is_empty());
}

#[test]
fn test_wrong_shape_payload_loads_empty() {
    let slots = InMemorySlots::new();
    slots.write(MEMORY_SLOT, r#"{"memories": []}"#).unwrap();
    let store = MemoryStore::new(slots);

    assert!(store.load().unwrap().is_empty());
}

#[test]
fn test_append_over_corrupt_payload_recovers() {
    let slots = InMemorySlots::new();
    slots.write(MEMORY_SLOT, "garbage").unwrap();
    let store = MemoryStore::new(slots);

    store.append(&facts(&["fresh"]), "q").unwrap();
    assert_eq!(contents(&store), vec!["fresh"]);
}

#[test]
fn test_sqlite_backed_store() {
    let store = MemoryStore::new(Database::open_in_memory().unwrap());
    store.append(&facts(&["A", "B"]), "q1").unwrap();
    store.append(&facts(&["C"]), "q2").unwrap();

    let loaded: Vec<String> = store.load().unwrap().into_iter().map(|m| m.content).collect();
    assert_eq!(loaded, vec!["C", "A", "B"]);

    store.clear().unwrap();
    assert!(store.load().unwrap().is_empty());
}

proptest! {
    #[test]
    fn prop_store_never_exceeds_capacity(batches in prop::collection::vec(0usize..40, 1..12)) {
        let store = MemoryStore::new(InMemorySlots::new());
        for (n, size) in batches.iter().enumerate() {
            let batch: Vec<String> = (0..*size).map(|i| format!("fact {n}-{i}")).collect();
            let returned = store.append(&batch, "q").unwrap();
            prop_assert!(returned.len() <= MEMORY_CAPACITY);
            prop_assert!(store.len().unwrap() <= MEMORY_CAPACITY);
        }
    }

    #[test]
    fn prop_newest_batch_leads_in_given_order(batch in prop::collection::vec("[a-z]{1,8}", 1..5)) {
        let store = MemoryStore::new(InMemorySlots::new());
        store.append(&facts(&["older"]), "q0").unwrap();
        store.append(&batch, "q1").unwrap();

        let loaded = contents(&store);
        prop_assert_eq!(&loaded[..batch.len()], &batch[..]);
        prop_assert_eq!(loaded.last().map(String::as_str), Some("older"));
    }
}
