//! Error types for counter store operations.

use std::io;
use thiserror::Error;

/// Result type for counter store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during counter store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Two writers raced to create the same counter record.
    ///
    /// This surfaces the unique-key constraint on `sequence_name`. It is a
    /// transient condition: the record now exists, so retrying the
    /// increment succeeds. Callers that drive the allocation loop retry
    /// this silently; it is never a terminal failure.
    #[error("duplicate counter record for sequence '{sequence}'")]
    DuplicateKey {
        /// The sequence whose counter record already exists.
        sequence: String,
    },

    /// The backing store could not be reached or timed out.
    #[error("counter store unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The persisted counter data could not be decoded.
    #[error("counter store corrupted: {message}")]
    Corrupted {
        /// Description of the corruption.
        message: String,
    },
}

impl StoreError {
    /// Creates a duplicate-key error for a sequence.
    pub fn duplicate_key(sequence: impl Into<String>) -> Self {
        Self::DuplicateKey {
            sequence: sequence.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a corruption error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted {
            message: message.into(),
        }
    }

    /// Returns true if this error is the transient duplicate-key conflict.
    #[must_use]
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}
