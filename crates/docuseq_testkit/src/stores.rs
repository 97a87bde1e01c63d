//! Counter store decorators for fault injection.
//!
//! These wrappers let tests observe and perturb the traffic between an
//! allocator and its counter store: counting round trips, injecting the
//! duplicate-key conflict two processes hit when creating a brand-new
//! counter, and simulating an unreachable store.

use docuseq_store::{CounterStore, StoreError, StoreResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A store wrapper that counts increment round trips.
pub struct CountingStore {
    inner: Arc<dyn CounterStore>,
    fetches: AtomicUsize,
}

impl CountingStore {
    /// Wraps an inner store.
    pub fn new(inner: Arc<dyn CounterStore>) -> Self {
        Self {
            inner,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Returns how many increment calls reached the inner store.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Resets the counter.
    pub fn reset(&self) {
        self.fetches.store(0, Ordering::SeqCst);
    }
}

impl CounterStore for CountingStore {
    fn increment_and_fetch(&self, sequence_name: &str) -> StoreResult<i64> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.increment_and_fetch(sequence_name)
    }

    fn current(&self, sequence_name: &str) -> StoreResult<Option<i64>> {
        self.inner.current(sequence_name)
    }
}

/// A store wrapper that answers a scripted number of increments with the
/// duplicate-key conflict before delegating.
///
/// This simulates the create-if-absent race: another process inserted the
/// counter record between our existence check and our insert, so the
/// unique-key constraint fires. The condition is transient; allocators
/// retry it silently.
pub struct ConflictStore {
    inner: Arc<dyn CounterStore>,
    conflicts: AtomicUsize,
}

impl ConflictStore {
    /// Wraps an inner store, answering the first `conflicts` increments
    /// with [`StoreError::DuplicateKey`].
    pub fn new(inner: Arc<dyn CounterStore>, conflicts: usize) -> Self {
        Self {
            inner,
            conflicts: AtomicUsize::new(conflicts),
        }
    }

    /// Returns how many scripted conflicts remain.
    pub fn conflicts_remaining(&self) -> usize {
        self.conflicts.load(Ordering::SeqCst)
    }
}

impl CounterStore for ConflictStore {
    fn increment_and_fetch(&self, sequence_name: &str) -> StoreResult<i64> {
        if self
            .conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| c.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::duplicate_key(sequence_name));
        }
        self.inner.increment_and_fetch(sequence_name)
    }

    fn current(&self, sequence_name: &str) -> StoreResult<Option<i64>> {
        self.inner.current(sequence_name)
    }
}

/// A store wrapper that fails a scripted number of increments with
/// [`StoreError::Unavailable`] before delegating.
pub struct FlakyStore {
    inner: Arc<dyn CounterStore>,
    failures: AtomicUsize,
}

impl FlakyStore {
    /// Wraps an inner store, failing the first `failures` increments.
    pub fn new(inner: Arc<dyn CounterStore>, failures: usize) -> Self {
        Self {
            inner,
            failures: AtomicUsize::new(failures),
        }
    }

    /// Returns how many scripted failures remain.
    pub fn failures_remaining(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }
}

impl CounterStore for FlakyStore {
    fn increment_and_fetch(&self, sequence_name: &str) -> StoreResult<i64> {
        if self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |f| f.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::unavailable("injected outage"));
        }
        self.inner.increment_and_fetch(sequence_name)
    }

    fn current(&self, sequence_name: &str) -> StoreResult<Option<i64>> {
        self.inner.current(sequence_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docuseq_store::InMemoryStore;

    #[test]
    fn counting_store_counts() {
        let store = CountingStore::new(Arc::new(InMemoryStore::new()));
        assert_eq!(store.fetch_count(), 0);

        store.increment_and_fetch("seq").unwrap();
        store.increment_and_fetch("seq").unwrap();
        assert_eq!(store.fetch_count(), 2);

        store.reset();
        assert_eq!(store.fetch_count(), 0);
    }

    #[test]
    fn conflict_store_scripted_then_delegates() {
        let store = ConflictStore::new(Arc::new(InMemoryStore::new()), 2);

        assert!(store.increment_and_fetch("seq").unwrap_err().is_duplicate_key());
        assert!(store.increment_and_fetch("seq").unwrap_err().is_duplicate_key());
        assert_eq!(store.conflicts_remaining(), 0);
        assert_eq!(store.increment_and_fetch("seq").unwrap(), 1);
    }

    #[test]
    fn flaky_store_scripted_then_delegates() {
        let store = FlakyStore::new(Arc::new(InMemoryStore::new()), 1);

        let err = store.increment_and_fetch("seq").unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { .. }));
        assert_eq!(store.increment_and_fetch("seq").unwrap(), 1);
    }
}
