//! Min/max byte ranges for memory estimation.
//!
//! Estimations in this crate are ranges rather than point values because the
//! compressed representation of an adjacency list depends on the actual id
//! distribution, which is unknown until load time.

use crate::mem::Estimate;
use std::fmt;

/// An inclusive range of memory usage estimates in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryRange {
    min: usize,
    max: usize,
}

impl MemoryRange {
    /// Creates a fixed range where min equals max.
    pub fn of(value: usize) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Creates a range from `min` to `max` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn of_range(min: usize, max: usize) -> Self {
        assert!(min <= max, "min {} exceeds max {}", min, max);
        Self { min, max }
    }

    /// The empty range.
    pub fn empty() -> Self {
        Self { min: 0, max: 0 }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn is_empty(&self) -> bool {
        self.min == 0 && self.max == 0
    }

    /// Component-wise addition of two ranges.
    pub fn add(&self, other: &MemoryRange) -> MemoryRange {
        MemoryRange {
            min: self.min.saturating_add(other.min),
            max: self.max.saturating_add(other.max),
        }
    }

    /// Scales both ends of the range by `count`.
    pub fn times(&self, count: usize) -> MemoryRange {
        MemoryRange {
            min: self.min.saturating_mul(count),
            max: self.max.saturating_mul(count),
        }
    }

    /// Component-wise maximum of two ranges.
    pub fn union(&self, other: &MemoryRange) -> MemoryRange {
        MemoryRange {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

impl fmt::Display for MemoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", Estimate::human_readable(self.min))
        } else {
            write!(
                f,
                "[{} ... {}]",
                Estimate::human_readable(self.min),
                Estimate::human_readable(self.max)
            )
        }
    }
}
