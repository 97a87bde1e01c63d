//! Property-based test generators.

use proptest::prelude::*;

/// Strategy producing valid (non-empty) sequence names.
pub fn sequence_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

/// Strategy producing valid block capacities.
pub fn capacity() -> impl Strategy<Value = i64> {
    1i64..=64
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn sequence_names_are_valid(name in sequence_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(name.len() <= 16);
        }

        #[test]
        fn capacities_are_positive(cap in capacity()) {
            prop_assert!(cap >= 1);
        }
    }
}
