//! Bounded memory of facts extracted from research answers.
//!
//! Provides load, append and clear over a single durable slot.

// pub(crate): module internals hidden; public items re-exported explicitly via lib.rs
pub(crate) mod store;

pub use store::{MemoryStore, MEMORY_SLOT};

#[cfg(test)]
mod tests;
