//! Error types for docuseq core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur during identifier allocation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Counter store error.
    ///
    /// Duplicate-key conflicts never appear here: the allocator retries
    /// them internally. Anything else from the store propagates unchanged.
    #[error("store error: {0}")]
    Store(#[from] docuseq_store::StoreError),

    /// The requested identifier width is not supported for narrowing.
    #[error("unsupported identifier width: {bits} bits")]
    UnsupportedWidth {
        /// The requested width in bits.
        bits: u32,
    },

    /// Block capacity must be a positive number of identifiers.
    #[error("invalid block capacity: {capacity}")]
    InvalidCapacity {
        /// The rejected capacity value.
        capacity: i64,
    },

    /// Sequence names must be non-empty.
    #[error("sequence name must not be empty")]
    EmptySequenceName,
}
