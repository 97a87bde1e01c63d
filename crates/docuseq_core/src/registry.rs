//! Per-process registry of sequence allocators.

use crate::allocator::{SequenceAllocator, DEFAULT_CAPACITY};
use crate::error::CoreResult;
use crate::width::{IdWidth, NarrowedId, SurrogateId};
use docuseq_store::CounterStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps sequence names to their allocators.
///
/// A registry guarantees at most one [`SequenceAllocator`] per sequence
/// name for its lifetime, so all allocation requests for one sequence
/// within a process funnel through one hi-lo state. The registry is an
/// explicit object: construct one over a [`CounterStore`] and hand it to
/// whatever needs identifiers. There is no global instance.
///
/// Lookups clone an `Arc` out of the current map under a read guard; an
/// insert builds a new map and replaces the old one wholesale, so readers
/// are never blocked behind allocator construction.
///
/// # Example
///
/// ```rust
/// use docuseq_core::SequenceRegistry;
/// use docuseq_store::InMemoryStore;
/// use std::sync::Arc;
///
/// let registry = SequenceRegistry::new(Arc::new(InMemoryStore::new()));
/// assert_eq!(registry.allocate("users").unwrap(), 1);
/// assert_eq!(registry.allocate("users").unwrap(), 2);
/// assert_eq!(registry.allocate("orders").unwrap(), 1);
/// ```
pub struct SequenceRegistry {
    store: Arc<dyn CounterStore>,
    capacity: i64,
    allocators: RwLock<Arc<HashMap<String, Arc<SequenceAllocator>>>>,
}

impl SequenceRegistry {
    /// Creates a registry with the default block capacity.
    #[must_use]
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self {
            store,
            capacity: DEFAULT_CAPACITY,
            allocators: RwLock::new(Arc::new(HashMap::new())),
        }
    }

    /// Creates a registry whose allocators claim blocks of `capacity`.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is not positive.
    pub fn with_capacity(store: Arc<dyn CounterStore>, capacity: i64) -> CoreResult<Self> {
        if capacity < 1 {
            return Err(crate::error::CoreError::InvalidCapacity { capacity });
        }
        Ok(Self {
            store,
            capacity,
            allocators: RwLock::new(Arc::new(HashMap::new())),
        })
    }

    /// Returns the allocator for `sequence_name`, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if `sequence_name` is empty.
    pub fn allocator(&self, sequence_name: &str) -> CoreResult<Arc<SequenceAllocator>> {
        self.allocator_with_capacity(sequence_name, self.capacity)
    }

    /// Like [`Self::allocator`], with a per-sequence block capacity.
    ///
    /// The capacity applies only when this call creates the allocator; an
    /// existing allocator is returned unmodified.
    ///
    /// # Errors
    ///
    /// Returns an error if `sequence_name` is empty or `capacity` is not
    /// positive.
    pub fn allocator_with_capacity(
        &self,
        sequence_name: &str,
        capacity: i64,
    ) -> CoreResult<Arc<SequenceAllocator>> {
        if let Some(allocator) = self.allocators.read().get(sequence_name) {
            return Ok(Arc::clone(allocator));
        }

        let mut current = self.allocators.write();
        // Re-check: another thread may have created it while we waited.
        if let Some(allocator) = current.get(sequence_name) {
            return Ok(Arc::clone(allocator));
        }

        let allocator = Arc::new(SequenceAllocator::new(
            sequence_name,
            capacity,
            Arc::clone(&self.store),
        )?);

        let mut next = HashMap::clone(&**current);
        next.insert(sequence_name.to_string(), Arc::clone(&allocator));
        *current = Arc::new(next);

        Ok(allocator)
    }

    /// Allocates the next wide identifier for `sequence_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence name is empty or the counter store
    /// fails.
    pub fn allocate(&self, sequence_name: &str) -> CoreResult<i64> {
        self.allocator(sequence_name)?.allocate()
    }

    /// Allocates an identifier narrowed to the given width.
    ///
    /// The cast truncates; see [`NarrowedId::narrow`].
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence name is empty or the counter store
    /// fails.
    pub fn allocate_narrowed(
        &self,
        sequence_name: &str,
        width: IdWidth,
    ) -> CoreResult<NarrowedId> {
        let wide = self.allocate(sequence_name)?;
        Ok(NarrowedId::narrow(wide, width))
    }

    /// Allocates an identifier as the entity's declared key type.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence name is empty or the counter store
    /// fails.
    pub fn allocate_key<K: SurrogateId>(&self, sequence_name: &str) -> CoreResult<K> {
        let wide = self.allocate(sequence_name)?;
        Ok(K::from_wide(wide))
    }

    /// Returns the number of sequences with an allocator in this registry.
    #[must_use]
    pub fn sequence_count(&self) -> usize {
        self.allocators.read().len()
    }
}

impl std::fmt::Debug for SequenceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceRegistry")
            .field("capacity", &self.capacity)
            .field("sequence_count", &self.sequence_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use docuseq_store::InMemoryStore;

    fn registry() -> SequenceRegistry {
        SequenceRegistry::new(Arc::new(InMemoryStore::new()))
    }

    #[test]
    fn allocator_is_created_once() {
        let registry = registry();

        let first = registry.allocator("users").unwrap();
        let second = registry.allocator("users").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.sequence_count(), 1);
    }

    #[test]
    fn sequences_get_distinct_allocators() {
        let registry = registry();

        let users = registry.allocator("users").unwrap();
        let orders = registry.allocator("orders").unwrap();
        assert!(!Arc::ptr_eq(&users, &orders));
        assert_eq!(registry.sequence_count(), 2);
    }

    #[test]
    fn allocate_starts_each_sequence_at_one() {
        let registry = registry();

        assert_eq!(registry.allocate("users").unwrap(), 1);
        assert_eq!(registry.allocate("users").unwrap(), 2);
        assert_eq!(registry.allocate("orders").unwrap(), 1);
    }

    #[test]
    fn existing_allocator_keeps_its_capacity() {
        let registry = registry();

        let first = registry.allocator_with_capacity("users", 5).unwrap();
        assert_eq!(first.capacity(), 5);

        // The later capacity is ignored; the existing allocator wins.
        let second = registry.allocator_with_capacity("users", 50).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.capacity(), 5);
    }

    #[test]
    fn with_capacity_validates() {
        let store: Arc<dyn CounterStore> = Arc::new(InMemoryStore::new());
        let result = SequenceRegistry::with_capacity(store, 0);
        assert!(matches!(result, Err(CoreError::InvalidCapacity { .. })));
    }

    #[test]
    fn empty_name_is_rejected() {
        let registry = registry();
        assert!(matches!(
            registry.allocate(""),
            Err(CoreError::EmptySequenceName)
        ));
    }

    #[test]
    fn allocate_narrowed_is_never_empty() {
        let registry = registry();

        for _ in 0..50 {
            let id = registry.allocate_narrowed("users", IdWidth::I32).unwrap();
            assert!(!id.is_empty());
        }
    }

    #[test]
    fn allocate_key_typed() {
        let registry = registry();

        let id: i32 = registry.allocate_key("users").unwrap();
        assert_eq!(id, 1);
        let id: i64 = registry.allocate_key("users").unwrap();
        assert_eq!(id, 2);
    }

    #[test]
    fn concurrent_lookup_yields_one_allocator() {
        use std::thread;

        let registry = Arc::new(registry());
        let mut handles = vec![];

        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(thread::spawn(move || registry.allocator("users").unwrap()));
        }

        let allocators: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for allocator in &allocators[1..] {
            assert!(Arc::ptr_eq(&allocators[0], allocator));
        }
        assert_eq!(registry.sequence_count(), 1);
    }
}
