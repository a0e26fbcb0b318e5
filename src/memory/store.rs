//! Capacity-bounded, most-recent-first store of extracted facts.

use chrono::Utc;

use crate::errors::Result;
use crate::memory_types::{MemoryItem, MEMORY_CAPACITY};
use crate::slots::SlotStore;

/// Name of the slot holding the serialized memory collection.
pub const MEMORY_SLOT: &str = "astra_memory_system";

/// Durable memory of facts learned across research sessions.
///
/// The whole collection lives in a single slot of the backing store as a JSON
/// array, newest first, never longer than [`MEMORY_CAPACITY`].
pub struct MemoryStore<S: SlotStore> {
    slots: S,
}

impl<S: SlotStore> MemoryStore<S> {
    /// Wrap a slot store.
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    /// Borrow the underlying slot store.
    pub fn slots(&self) -> &S {
        &self.slots
    }

    /// Load the persisted collection, most recent first.
    ///
    /// A missing slot and an unparseable payload both yield an empty list.
    ///
    /// # Errors
    ///
    /// Returns error only if the backing store cannot be read.
    pub fn load(&self) -> Result<Vec<MemoryItem>> {
        let Some(payload) = self.slots.read(MEMORY_SLOT)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<MemoryItem>>(&payload) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(
                    slot = MEMORY_SLOT,
                    error = %e,
                    "Memory payload is corrupt, treating store as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Prepend new facts learned from `source` and persist the result.
    ///
    /// Facts keep the order given and land ahead of every existing item. The
    /// collection is then cut to [`MEMORY_CAPACITY`], dropping the oldest.
    /// Blank facts are skipped.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be read or written.
    pub fn append(&self, new_facts: &[String], source: &str) -> Result<Vec<MemoryItem>> {
        let current = self.load()?;
        let now = Utc::now().timestamp_millis();

        let mut updated: Vec<MemoryItem> = new_facts
            .iter()
            .filter(|fact| !fact.trim().is_empty())
            .map(|fact| MemoryItem::extracted(fact.as_str(), source, now))
            .collect();
        let added = updated.len();
        updated.extend(current);
        updated.truncate(MEMORY_CAPACITY);

        let payload = serde_json::to_string(&updated)?;
        self.slots.write(MEMORY_SLOT, &payload)?;

        tracing::debug!(
            added,
            total = updated.len(),
            "Persisted memory items"
        );
        Ok(updated)
    }

    /// Delete every stored fact.
    pub fn clear(&self) -> Result<()> {
        self.slots.remove(MEMORY_SLOT)?;
        tracing::debug!(slot = MEMORY_SLOT, "Cleared memory");
        Ok(())
    }

    /// Number of stored facts.
    pub fn len(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    /// Whether the store holds no facts.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
