//! # docuseq core
//!
//! Hi-lo surrogate identifier allocation over a shared counter store.
//!
//! This crate provides:
//! - [`SequenceAllocator`] - gap-free, strictly increasing identifiers for
//!   one named sequence, amortizing store round trips by claiming blocks
//! - [`SequenceRegistry`] - one allocator per sequence name per process,
//!   created lazily under a lock
//! - [`IdWidth`] / [`NarrowedId`] / [`SurrogateId`] - truncating narrowing
//!   of the wide allocator output to a caller-declared identifier width
//!
//! The backing store is abstract: anything implementing
//! [`docuseq_store::CounterStore`] works, from the bundled in-memory and
//! file-backed stores to a document database exposing an atomic
//! find-and-increment.
//!
//! ## Example
//!
//! ```rust
//! use docuseq_core::{IdWidth, SequenceRegistry};
//! use docuseq_store::InMemoryStore;
//! use std::sync::Arc;
//!
//! let registry = SequenceRegistry::new(Arc::new(InMemoryStore::new()));
//!
//! let wide = registry.allocate("users").unwrap();
//! assert_eq!(wide, 1);
//!
//! let narrow = registry.allocate_narrowed("users", IdWidth::I32).unwrap();
//! assert!(!narrow.is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod allocator;
mod error;
mod registry;
mod width;

pub use allocator::{SequenceAllocator, DEFAULT_CAPACITY};
pub use error::{CoreError, CoreResult};
pub use registry::SequenceRegistry;
pub use width::{IdWidth, NarrowedId, SurrogateId};
