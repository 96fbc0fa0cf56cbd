//! Filter definitions for dimensions.
//!
//! This module defines `KeyRange`, the ordered key interval used by exact and
//! range filters, and `DimensionFilter`, the value a dimension keeps on its
//! filter stack.

use alloc::boxed::Box;
use core::fmt;
use snapshot_core::Value;

/// A key range for dimension filters.
#[derive(Clone, Debug, PartialEq)]
pub enum KeyRange<K> {
    /// All keys
    All,
    /// A single key (equality)
    Only(K),
    /// Keys >= lower bound
    LowerBound { value: K, exclusive: bool },
    /// Keys <= upper bound
    UpperBound { value: K, exclusive: bool },
    /// Keys between lower and upper bounds
    Bound {
        lower: K,
        upper: K,
        lower_exclusive: bool,
        upper_exclusive: bool,
    },
}

impl<K: Clone + Ord> KeyRange<K> {
    /// Creates a range for all keys.
    pub fn all() -> Self {
        KeyRange::All
    }

    /// Creates a range for a single key.
    pub fn only(key: K) -> Self {
        KeyRange::Only(key)
    }

    /// Creates a range with a lower bound.
    pub fn lower_bound(value: K, exclusive: bool) -> Self {
        KeyRange::LowerBound { value, exclusive }
    }

    /// Creates a range with an upper bound.
    pub fn upper_bound(value: K, exclusive: bool) -> Self {
        KeyRange::UpperBound { value, exclusive }
    }

    /// Creates a range with both bounds.
    pub fn bound(lower: K, upper: K, lower_exclusive: bool, upper_exclusive: bool) -> Self {
        KeyRange::Bound {
            lower,
            upper,
            lower_exclusive,
            upper_exclusive,
        }
    }

    /// Creates the inclusive range `[low, high]`.
    pub fn inclusive(low: K, high: K) -> Self {
        Self::bound(low, high, false, false)
    }

    /// Returns true if this range represents a single value (equality).
    pub fn is_only(&self) -> bool {
        matches!(self, KeyRange::Only(_))
    }

    /// Returns true if this range represents all values (unbounded).
    pub fn is_all(&self) -> bool {
        matches!(self, KeyRange::All)
    }

    /// Checks if a key is within this range.
    pub fn contains(&self, key: &K) -> bool {
        !self.is_below(key) && !self.is_above(key)
    }

    /// Returns true if `key` sorts before every key of the range.
    ///
    /// Monotone over ascending keys, so it can drive a binary search.
    pub fn is_below(&self, key: &K) -> bool {
        match self {
            KeyRange::All | KeyRange::UpperBound { .. } => false,
            KeyRange::Only(k) => key < k,
            KeyRange::LowerBound { value, exclusive }
            | KeyRange::Bound {
                lower: value,
                lower_exclusive: exclusive,
                ..
            } => {
                if *exclusive {
                    key <= value
                } else {
                    key < value
                }
            }
        }
    }

    /// Returns true if `key` sorts after every key of the range.
    pub fn is_above(&self, key: &K) -> bool {
        match self {
            KeyRange::All | KeyRange::LowerBound { .. } => false,
            KeyRange::Only(k) => key > k,
            KeyRange::UpperBound { value, exclusive }
            | KeyRange::Bound {
                upper: value,
                upper_exclusive: exclusive,
                ..
            } => {
                if *exclusive {
                    key >= value
                } else {
                    key > value
                }
            }
        }
    }
}

/// Predicate type for arbitrary filters.
pub type ValuePredicate = Box<dyn Fn(&Value) -> bool + Send + Sync>;

/// One entry of a dimension's filter stack.
///
/// Every entry on a stack must accept a record's value for the record to pass
/// that dimension.
pub enum DimensionFilter {
    /// Ordered interval over the dimension's values (exact match is `Only`).
    Range(KeyRange<Value>),
    /// Arbitrary test over the dimension's value.
    Predicate(ValuePredicate),
}

impl DimensionFilter {
    /// Exact-match filter.
    pub fn exact(value: impl Into<Value>) -> Self {
        DimensionFilter::Range(KeyRange::only(value.into()))
    }

    /// Predicate filter.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        DimensionFilter::Predicate(Box::new(f))
    }

    /// Tests one value against this filter.
    #[inline]
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            DimensionFilter::Range(range) => range.contains(value),
            DimensionFilter::Predicate(f) => f(value),
        }
    }
}

impl From<KeyRange<Value>> for DimensionFilter {
    fn from(range: KeyRange<Value>) -> Self {
        DimensionFilter::Range(range)
    }
}

impl fmt::Debug for DimensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionFilter::Range(range) => f.debug_tuple("Range").field(range).finish(),
            DimensionFilter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
