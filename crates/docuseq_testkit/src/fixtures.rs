//! Test fixtures and registry helpers.

use crate::stores::CountingStore;
use docuseq_core::SequenceRegistry;
use docuseq_store::{FileStore, InMemoryStore};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Creates a registry over a fresh in-memory store.
///
/// Returns the store too, so tests can inspect counter values.
pub fn memory_registry() -> (Arc<InMemoryStore>, SequenceRegistry) {
    let store = Arc::new(InMemoryStore::new());
    let registry = SequenceRegistry::new(store.clone());
    (store, registry)
}

/// Creates a registry whose store counts increment round trips.
///
/// # Panics
///
/// Panics if `capacity` is not positive.
pub fn counting_registry(capacity: i64) -> (Arc<CountingStore>, SequenceRegistry) {
    let store = Arc::new(CountingStore::new(Arc::new(InMemoryStore::new())));
    let registry = SequenceRegistry::with_capacity(store.clone(), capacity).unwrap();
    (store, registry)
}

/// Creates a temporary counter file path.
///
/// The file lives inside a fresh temporary directory; keep the returned
/// [`TempDir`] alive for as long as the path is used.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
pub fn temp_counter_file() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("counters.cbor");
    (dir, path)
}

/// Opens a [`FileStore`] on a temporary file.
///
/// # Panics
///
/// Panics if the store cannot be opened.
pub fn temp_file_store() -> (TempDir, Arc<FileStore>) {
    let (dir, path) = temp_counter_file();
    let store = Arc::new(FileStore::open(&path).unwrap());
    (dir, store)
}

/// Installs a tracing subscriber reading `RUST_LOG`, once per process.
///
/// Handy when debugging a failing allocation test: run with
/// `RUST_LOG=docuseq_core=trace`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
