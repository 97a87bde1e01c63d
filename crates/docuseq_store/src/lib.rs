//! # docuseq store
//!
//! Counter store contract and backends for docuseq.
//!
//! This crate provides the lowest-level dependency of the docuseq
//! allocation core: a shared store of named, monotonically increasing
//! counters. Stores know nothing about hi-lo blocks or identifier
//! widths - they expose one atomic primitive, "increment the counter
//! for this sequence name and return the new value, creating it at 1
//! if absent", plus a non-mutating read.
//!
//! ## Design Principles
//!
//! - One counter record per sequence name, uniquely keyed
//! - The increment is atomic at the store level, across processes
//! - Concurrent first-time creation surfaces as a distinguishable
//!   duplicate-key error, which callers retry
//! - Must be `Send + Sync` for concurrent access
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and ephemeral use
//! - [`FileStore`] - File-backed, shared across processes
//!
//! ## Example
//!
//! ```rust
//! use docuseq_store::{CounterStore, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! assert_eq!(store.increment_and_fetch("users").unwrap(), 1);
//! assert_eq!(store.increment_and_fetch("users").unwrap(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod counter;
mod error;
mod file;
mod memory;
mod store;

pub use counter::SequenceCounter;
pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use store::CounterStore;
