//! Counter store trait definition.

use crate::error::StoreResult;

/// A shared store of named sequence counters.
///
/// This is the only wire-level dependency of the allocation core. A store
/// holds one counter record per sequence name, uniquely keyed, and must
/// provide a single atomic primitive: find the record by key, increment its
/// counter by 1, and return the new value, creating the record with value 1
/// if it does not exist (upsert semantics).
///
/// # Invariants
///
/// - `increment_and_fetch` is atomic at the store level: no two callers,
///   in any process, ever observe the same returned value for one sequence.
/// - Returned values for one sequence start at 1 and increase by exactly 1
///   per successful call.
/// - The unique-key constraint on `sequence_name` makes a concurrent
///   first-time creation fail with [`StoreError::DuplicateKey`] rather than
///   silently producing two records. Callers retry that condition.
/// - Stores must be `Send + Sync` for concurrent access.
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - Process-local, for tests
/// - [`super::FileStore`] - File-backed, shared across processes
///
/// [`StoreError::DuplicateKey`]: crate::StoreError::DuplicateKey
pub trait CounterStore: Send + Sync {
    /// Atomically increments the counter for `sequence_name` and returns
    /// the new value, creating the record with value 1 if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Another writer won a concurrent first-time creation
    ///   ([`StoreError::DuplicateKey`] - transient, retryable)
    /// - The store is unreachable or an I/O error occurs
    ///
    /// [`StoreError::DuplicateKey`]: crate::StoreError::DuplicateKey
    fn increment_and_fetch(&self, sequence_name: &str) -> StoreResult<i64>;

    /// Reads the current counter value without modifying it.
    ///
    /// Returns `None` if the sequence has never been fetched from.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or an I/O error occurs.
    fn current(&self, sequence_name: &str) -> StoreResult<Option<i64>>;
}
