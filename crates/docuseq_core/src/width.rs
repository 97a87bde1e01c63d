//! Identifier width narrowing.
//!
//! The allocator computes identifiers as `i64`. Entity identifier fields
//! are often narrower; this module converts the wide value to the width a
//! caller declares, either dynamically through [`IdWidth`]/[`NarrowedId`]
//! or statically through the [`SurrogateId`] trait.
//!
//! Narrowing is a raw truncating cast, not a range check: a wide value
//! that exceeds the target width wraps around exactly as an `as` cast
//! does. That precision loss is deliberate and documented, not an error.

use crate::error::{CoreError, CoreResult};
use std::fmt;

/// Supported identifier widths for dynamic narrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdWidth {
    /// 32-bit signed identifier.
    I32,
    /// 64-bit signed identifier.
    I64,
}

impl IdWidth {
    /// Resolves a width from a bit count.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedWidth`] for anything other than 32
    /// or 64 bits. An unsupported width is a configuration mistake and
    /// fails immediately; it is never mapped to a silent absent value.
    pub fn from_bits(bits: u32) -> CoreResult<Self> {
        match bits {
            32 => Ok(Self::I32),
            64 => Ok(Self::I64),
            _ => Err(CoreError::UnsupportedWidth { bits }),
        }
    }

    /// Returns the width in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::I32 => 32,
            Self::I64 => 64,
        }
    }
}

impl fmt::Display for IdWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.bits())
    }
}

/// A wide identifier narrowed to a caller-declared width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NarrowedId {
    /// A 32-bit identifier.
    I32(i32),
    /// A 64-bit identifier.
    I64(i64),
}

impl NarrowedId {
    /// Narrows a wide allocator value to the given width.
    ///
    /// The cast truncates; values outside the target range wrap.
    #[must_use]
    pub fn narrow(wide: i64, width: IdWidth) -> Self {
        match width {
            #[allow(clippy::cast_possible_truncation)]
            IdWidth::I32 => Self::I32(wide as i32),
            IdWidth::I64 => Self::I64(wide),
        }
    }

    /// Returns true iff the value is the zero value of its width.
    ///
    /// Callers use this to decide whether an entity already carries an
    /// assigned identifier.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::I32(0) | Self::I64(0))
    }

    /// Returns the width of this identifier.
    #[must_use]
    pub fn width(&self) -> IdWidth {
        match self {
            Self::I32(_) => IdWidth::I32,
            Self::I64(_) => IdWidth::I64,
        }
    }

    /// Widens the value back to `i64` (sign-extending).
    #[must_use]
    pub fn widen(&self) -> i64 {
        match self {
            Self::I32(v) => i64::from(*v),
            Self::I64(v) => *v,
        }
    }
}

impl fmt::Display for NarrowedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
        }
    }
}

/// A signed integer type usable as an entity's surrogate identifier.
///
/// Implemented for `i8` through `i64`, so identifier fields of any signed
/// width can receive allocator output at compile time. The conversion
/// truncates exactly like the dynamic path.
pub trait SurrogateId: Copy + Eq {
    /// The zero value, meaning "no identifier assigned yet".
    const EMPTY: Self;

    /// Truncating conversion from the wide allocator value.
    fn from_wide(wide: i64) -> Self;

    /// Returns true iff the value is the type's zero value.
    fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

macro_rules! impl_surrogate_id {
    ($($ty:ty),*) => {
        $(
            impl SurrogateId for $ty {
                const EMPTY: Self = 0;

                #[allow(clippy::cast_possible_truncation, clippy::unnecessary_cast)]
                fn from_wide(wide: i64) -> Self {
                    wide as $ty
                }
            }
        )*
    };
}

impl_surrogate_id!(i8, i16, i32, i64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bits_resolves_supported_widths() {
        assert_eq!(IdWidth::from_bits(32).unwrap(), IdWidth::I32);
        assert_eq!(IdWidth::from_bits(64).unwrap(), IdWidth::I64);
    }

    #[test]
    fn from_bits_rejects_unsupported_widths() {
        for bits in [0, 8, 16, 48, 128] {
            let result = IdWidth::from_bits(bits);
            assert!(matches!(result, Err(CoreError::UnsupportedWidth { .. })));
        }
    }

    #[test]
    fn narrow_within_range_preserves_value() {
        let id = NarrowedId::narrow(42, IdWidth::I32);
        assert_eq!(id, NarrowedId::I32(42));
        assert_eq!(id.widen(), 42);
    }

    #[test]
    fn narrow_truncates_at_boundary() {
        // 2^31 wraps to i32::MIN, exactly as an `as` cast does.
        let id = NarrowedId::narrow(2_147_483_648, IdWidth::I32);
        assert_eq!(id, NarrowedId::I32(-2_147_483_648));
    }

    #[test]
    fn narrow_to_i64_is_lossless() {
        let id = NarrowedId::narrow(i64::MAX, IdWidth::I64);
        assert_eq!(id, NarrowedId::I64(i64::MAX));
    }

    #[test]
    fn is_empty_only_for_zero() {
        assert!(NarrowedId::I32(0).is_empty());
        assert!(NarrowedId::I64(0).is_empty());
        assert!(!NarrowedId::I32(1).is_empty());
        assert!(!NarrowedId::I64(-1).is_empty());
    }

    #[test]
    fn width_accessor() {
        assert_eq!(NarrowedId::I32(1).width(), IdWidth::I32);
        assert_eq!(NarrowedId::I64(1).width(), IdWidth::I64);
        assert_eq!(format!("{}", IdWidth::I32), "i32");
    }

    #[test]
    fn surrogate_trait_truncates() {
        assert_eq!(i32::from_wide(2_147_483_648), i32::MIN);
        assert_eq!(i16::from_wide(65_537), 1);
        assert_eq!(i64::from_wide(i64::MAX), i64::MAX);
    }

    #[test]
    fn surrogate_trait_empty() {
        assert!(0i32.is_empty());
        assert!(!7i32.is_empty());
        assert_eq!(i64::EMPTY, 0);
    }
}
