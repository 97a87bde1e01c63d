//! # docuseq testkit
//!
//! Test utilities for docuseq.
//!
//! This crate provides:
//! - Counter store decorators for fault injection (round-trip counting,
//!   scripted duplicate-key conflicts, scripted outages)
//! - Registry and store fixtures over in-memory and temporary file stores
//! - Property-based test generators using proptest
//!
//! Cross-crate integration tests for the allocation core live in this
//! crate's `tests/` directory.
//!
//! ## Usage
//!
//! ```rust
//! use docuseq_testkit::prelude::*;
//!
//! let (store, registry) = counting_registry(20);
//! registry.allocate("users").unwrap();
//! assert_eq!(store.fetch_count(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stores;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stores::*;
}

pub use fixtures::*;
pub use stores::*;
