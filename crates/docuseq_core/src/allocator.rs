//! Hi-lo sequence allocator.

use crate::error::{CoreError, CoreResult};
use docuseq_store::CounterStore;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Default number of identifiers claimed per counter fetch.
pub const DEFAULT_CAPACITY: i64 = 20;

/// Dispenses strictly increasing identifiers for one named sequence.
///
/// The allocator pre-claims blocks of `capacity` identifiers: a single
/// round trip to the counter store buys a "high" value, and the next
/// `capacity` allocations are served from memory by combining that high
/// value with a locally incremented "low" offset:
///
/// ```text
/// identifier = (hi - 1) * capacity + low,    low in 1..=capacity
/// ```
///
/// Consecutive high values therefore produce disjoint, increasing ranges,
/// and each block is owned by exactly one successful store increment, so
/// identifiers are unique even when several processes allocate against the
/// same sequence.
///
/// # Concurrency
///
/// The fast path is one atomic increment of the low counter under a shared
/// read guard. When the block runs out, the thread that noticed takes the
/// write guard, re-checks exhaustion (another thread may have refreshed the
/// block while it waited), and performs the store fetch alone; racing
/// threads simply retry against the fresh block. One store round trip per
/// exhaustion event, no matter how many threads race past the boundary.
///
/// # Failure
///
/// A failed fetch leaves `hi` and `low` untouched, so the allocator stays
/// in its exhausted state and the next call retries the fetch cleanly. The
/// only error handled internally is the duplicate-key conflict two
/// processes can hit when creating a brand-new counter record; that is
/// retried silently.
///
/// # Gaps
///
/// A process that stops mid-block strands the unused remainder of its last
/// claimed block. That is deliberate: uniqueness over density. Per-instance
/// output is gap-free; gaps appear only across restarts.
pub struct SequenceAllocator {
    sequence_name: String,
    capacity: i64,
    store: Arc<dyn CounterStore>,
    /// Last fetched high value; 0 means no block fetched yet.
    current_hi: RwLock<i64>,
    /// Offset within the current block; starts past `capacity` to force a
    /// fetch on first use.
    current_low: AtomicI64,
}

impl SequenceAllocator {
    /// Creates an allocator for `sequence_name` with the given block size.
    ///
    /// # Errors
    ///
    /// Returns an error if `sequence_name` is empty or `capacity` is not
    /// positive.
    pub fn new(
        sequence_name: impl Into<String>,
        capacity: i64,
        store: Arc<dyn CounterStore>,
    ) -> CoreResult<Self> {
        let sequence_name = sequence_name.into();
        if sequence_name.is_empty() {
            return Err(CoreError::EmptySequenceName);
        }
        if capacity < 1 {
            return Err(CoreError::InvalidCapacity { capacity });
        }

        Ok(Self {
            sequence_name,
            capacity,
            store,
            current_hi: RwLock::new(0),
            current_low: AtomicI64::new(capacity + 1),
        })
    }

    /// Returns the sequence name this allocator serves.
    #[must_use]
    pub fn sequence_name(&self) -> &str {
        &self.sequence_name
    }

    /// Returns the block size.
    #[must_use]
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Allocates the next identifier.
    ///
    /// Most calls complete with one atomic increment. Every `capacity`-th
    /// call performs one counter store round trip to claim the next block.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter store fails. The allocator state is
    /// unchanged in that case; calling again retries the fetch.
    pub fn allocate(&self) -> CoreResult<i64> {
        loop {
            {
                let hi = self.current_hi.read();
                let low = self.current_low.fetch_add(1, Ordering::AcqRel) + 1;
                if low <= self.capacity {
                    return Ok((*hi - 1) * self.capacity + low);
                }
            }

            // Block exhausted. Take the write guard and re-check: another
            // thread may have installed a fresh block while we waited.
            let mut hi = self.current_hi.write();
            if self.current_low.load(Ordering::Acquire) < self.capacity {
                continue;
            }

            let fetched = self.next_hi()?;
            *hi = fetched;
            self.current_low.store(1, Ordering::Release);
            return Ok((fetched - 1) * self.capacity + 1);
        }
    }

    /// Claims the next high value from the counter store.
    ///
    /// Retries silently on the duplicate-key conflict raised when two
    /// processes race to create a brand-new counter record. All other
    /// store errors propagate.
    fn next_hi(&self) -> CoreResult<i64> {
        loop {
            match self.store.increment_and_fetch(&self.sequence_name) {
                Ok(hi) => {
                    debug!(
                        sequence = %self.sequence_name,
                        hi,
                        capacity = self.capacity,
                        "fetched new high value"
                    );
                    return Ok(hi);
                }
                Err(err) if err.is_duplicate_key() => {
                    trace!(
                        sequence = %self.sequence_name,
                        "counter created concurrently, retrying fetch"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl std::fmt::Debug for SequenceAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceAllocator")
            .field("sequence_name", &self.sequence_name)
            .field("capacity", &self.capacity)
            .field("current_hi", &*self.current_hi.read())
            .field("current_low", &self.current_low.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
