//! The persisted sequence counter record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One persisted counter record per sequence name.
///
/// The counter is the authoritative source of "high" values for hi-lo
/// allocation. `server_value` moves in steps of exactly 1, only upward,
/// and is never reused: each successful increment claims one block of
/// identifiers for whichever process performed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceCounter {
    /// Unique key of the record.
    pub sequence_name: String,
    /// Monotonically increasing counter value.
    pub server_value: i64,
}

impl SequenceCounter {
    /// Creates the record a store writes when a sequence is first seen.
    #[must_use]
    pub fn first(sequence_name: impl Into<String>) -> Self {
        Self {
            sequence_name: sequence_name.into(),
            server_value: 1,
        }
    }

    /// Returns the record after one increment.
    #[must_use]
    pub fn incremented(&self) -> Self {
        Self {
            sequence_name: self.sequence_name.clone(),
            server_value: self.server_value + 1,
        }
    }
}

impl fmt::Display for SequenceCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.sequence_name, self.server_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_starts_at_one() {
        let counter = SequenceCounter::first("users");
        assert_eq!(counter.sequence_name, "users");
        assert_eq!(counter.server_value, 1);
    }

    #[test]
    fn incremented_steps_by_one() {
        let counter = SequenceCounter::first("users");
        let next = counter.incremented();
        assert_eq!(next.server_value, 2);
        assert_eq!(next.sequence_name, "users");
    }

    #[test]
    fn display() {
        let counter = SequenceCounter::first("orders");
        assert_eq!(format!("{counter}"), "orders=1");
    }
}
