//! Concurrent allocation across threads and registries.

use docuseq_core::SequenceRegistry;
use docuseq_store::{CounterStore, InMemoryStore};
use docuseq_testkit::prelude::*;
use std::sync::Arc;
use std::thread;

#[test]
fn concurrent_allocations_are_unique_with_exact_fetch_count() {
    // 10 threads x 40 allocations = 400 identifiers = 20 full blocks.
    let (store, registry) = counting_registry(20);
    let registry = Arc::new(registry);
    let mut handles = vec![];

    for _ in 0..10 {
        let registry = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            (0..40)
                .map(|_| registry.allocate("users").unwrap())
                .collect::<Vec<_>>()
        }));
    }

    let mut values: Vec<i64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    values.sort_unstable();
    let before = values.len();
    values.dedup();

    assert_eq!(values.len(), before, "duplicate identifiers issued");
    assert_eq!(values.len(), 400);
    // One store round trip per exhausted block - not one per thread.
    assert_eq!(store.fetch_count(), 20);
}

#[test]
fn sequences_do_not_interfere_under_concurrency() {
    let (_, registry) = memory_registry();
    let registry = Arc::new(registry);
    let mut handles = vec![];

    for i in 0..8 {
        let registry = Arc::clone(&registry);
        let name = if i % 2 == 0 { "users" } else { "orders" };
        handles.push(thread::spawn(move || {
            (0..100)
                .map(|_| (name, registry.allocate(name).unwrap()))
                .collect::<Vec<_>>()
        }));
    }

    let mut users = vec![];
    let mut orders = vec![];
    for handle in handles {
        for (name, value) in handle.join().unwrap() {
            match name {
                "users" => users.push(value),
                _ => orders.push(value),
            }
        }
    }

    for values in [&mut users, &mut orders] {
        values.sort_unstable();
        let before = values.len();
        values.dedup();
        assert_eq!(values.len(), before);
        assert_eq!(values.len(), 400);
    }
}

#[test]
fn two_registries_racing_on_one_store_never_collide() {
    let store: Arc<dyn CounterStore> = Arc::new(InMemoryStore::new());
    let registries = [
        Arc::new(SequenceRegistry::new(Arc::clone(&store))),
        Arc::new(SequenceRegistry::new(Arc::clone(&store))),
    ];
    let mut handles = vec![];

    for registry in &registries {
        for _ in 0..4 {
            let registry = Arc::clone(registry);
            handles.push(thread::spawn(move || {
                (0..50)
                    .map(|_| registry.allocate("users").unwrap())
                    .collect::<Vec<_>>()
            }));
        }
    }

    let mut values: Vec<i64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    values.sort_unstable();
    let before = values.len();
    values.dedup();

    assert_eq!(values.len(), before, "registries handed out the same identifier");
    assert_eq!(values.len(), 400);
}
