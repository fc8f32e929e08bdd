//! Accumulated offset descriptor
//!
//! A `LocationSet` is the constant offset collected along a chain of
//! pointer-arithmetic statements. Nested geps compose by checked addition;
//! a sum outside `i64` is reported by the caller, never wrapped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Accumulated field/byte offset from a base pointer or base object
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LocationSet {
    offset: i64,
}

impl LocationSet {
    /// Offset zero (the base itself)
    pub const ZERO: LocationSet = LocationSet { offset: 0 };

    #[inline]
    pub const fn new(offset: i64) -> Self {
        Self { offset }
    }

    #[inline]
    pub fn offset(&self) -> i64 {
        self.offset
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.offset == 0
    }

    /// Compose two offsets; `None` when the sum leaves the `i64` range
    #[inline]
    pub fn checked_add(self, rhs: LocationSet) -> Option<LocationSet> {
        self.offset.checked_add(rhs.offset).map(LocationSet::new)
    }
}

impl From<i64> for LocationSet {
    fn from(offset: i64) -> Self {
        Self::new(offset)
    }
}

impl fmt::Display for LocationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition() {
        let a = LocationSet::new(2);
        let b = LocationSet::new(3);
        assert_eq!(a.checked_add(b).map(|ls| ls.offset()), Some(5));
        assert_eq!(LocationSet::ZERO.checked_add(a), Some(a));
    }

    #[test]
    fn test_composition_overflow() {
        let max = LocationSet::new(i64::MAX);
        assert_eq!(max.checked_add(LocationSet::new(1)), None);
        assert_eq!(
            LocationSet::new(i64::MIN).checked_add(LocationSet::new(-1)),
            None
        );
        assert_eq!(max.checked_add(LocationSet::new(-1)), Some(LocationSet::new(i64::MAX - 1)));
    }

    #[test]
    fn test_ordering_for_map_keys() {
        let mut sets = vec![LocationSet::new(4), LocationSet::new(-1), LocationSet::new(0)];
        sets.sort();
        assert_eq!(sets, vec![LocationSet::new(-1), LocationSet::ZERO, LocationSet::new(4)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(LocationSet::new(8).to_string(), "[8]");
    }
}
