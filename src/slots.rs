//! Key-value durable storage abstraction.
//!
//! The memory store persists its whole collection under one named slot. A
//! `SlotStore` only needs whole-value reads, atomic overwrites and removal.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::errors::Result;

/// Durable key-value storage with whole-value semantics.
pub trait SlotStore: Send {
    /// Read the value stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`. Readers never observe a partial write.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: SlotStore + Sync + ?Sized> SlotStore for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Process-local slot store, used by tests and embedders that do not need persistence.
#[derive(Debug, Default)]
pub struct InMemorySlots {
    slots: Mutex<HashMap<String, String>>,
}

impl InMemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SlotStore for InMemorySlots {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_slot() {
        let slots = InMemorySlots::new();
        assert_eq!(slots.read("nothing").unwrap(), None);
    }

    #[test]
    fn test_write_overwrites() {
        let slots = InMemorySlots::new();
        slots.write("k", "first").unwrap();
        slots.write("k", "second").unwrap();
        assert_eq!(slots.read("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_shared_handle_sees_writes() {
        let shared = Arc::new(InMemorySlots::new());
        let handle = Arc::clone(&shared);
        handle.write("k", "v").unwrap();
        assert_eq!(shared.read("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let slots = InMemorySlots::new();
        slots.remove("k").unwrap();
        slots.write("k", "v").unwrap();
        slots.remove("k").unwrap();
        assert_eq!(slots.read("k").unwrap(), None);
    }
}
