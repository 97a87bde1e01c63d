//! In-memory counter store for testing.

use crate::error::StoreResult;
use crate::store::CounterStore;
use parking_lot::Mutex;
use std::collections::HashMap;

/// An in-memory counter store.
///
/// Counters live in a process-local map and are lost when the store is
/// dropped. Suitable for:
/// - Unit tests
/// - Integration tests simulating several registries over one store
/// - Ephemeral deployments that don't need persistence
///
/// The whole map is guarded by one mutex, so increments are trivially
/// atomic and the duplicate-key condition cannot arise here.
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use docuseq_store::{CounterStore, InMemoryStore};
///
/// let store = InMemoryStore::new();
/// assert_eq!(store.increment_and_fetch("users").unwrap(), 1);
/// assert_eq!(store.increment_and_fetch("users").unwrap(), 2);
/// assert_eq!(store.current("users").unwrap(), Some(2));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    counters: Mutex<HashMap<String, i64>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with pre-seeded counter values.
    ///
    /// Useful for testing recovery and multi-process scenarios.
    #[must_use]
    pub fn with_counters(counters: HashMap<String, i64>) -> Self {
        Self {
            counters: Mutex::new(counters),
        }
    }

    /// Returns a snapshot of all counters.
    #[must_use]
    pub fn counters(&self) -> HashMap<String, i64> {
        self.counters.lock().clone()
    }

    /// Removes all counters.
    pub fn clear(&self) {
        self.counters.lock().clear();
    }
}

impl CounterStore for InMemoryStore {
    fn increment_and_fetch(&self, sequence_name: &str) -> StoreResult<i64> {
        let mut counters = self.counters.lock();
        let value = counters.entry(sequence_name.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    fn current(&self, sequence_name: &str) -> StoreResult<Option<i64>> {
        Ok(self.counters.lock().get(sequence_name).copied())
    }
}
