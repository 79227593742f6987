use std::fmt;
use std::num::NonZeroUsize;

/// Represents a concurrency level (number of workers) for parallel phases.
///
/// A type-safe wrapper around a positive integer. The value is a hint: it
/// sizes shard counts, partitions, and page layouts, but does not itself
/// spawn threads.
///
/// # Examples
///
/// ```ignore
/// use graphmem::concurrency::Concurrency;
///
/// let c = Concurrency::of(4);
/// assert_eq!(c.value(), 4);
///
/// let c = Concurrency::available_cores();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Concurrency {
    value: NonZeroUsize,
}

impl Concurrency {
    /// Creates a new Concurrency with the specified value.
    ///
    /// Returns `None` if value is 0.
    pub fn new(value: usize) -> Option<Self> {
        NonZeroUsize::new(value).map(|v| Self { value: v })
    }

    /// Creates a new Concurrency with the specified value.
    ///
    /// # Panics
    ///
    /// Panics if value is 0.
    pub fn of(value: usize) -> Self {
        Self::new(value)
            .unwrap_or_else(|| panic!("Valid concurrency values are 1 or greater, got {}", value))
    }

    /// Single-threaded execution.
    pub fn single_threaded() -> Self {
        Self::of(1)
    }

    /// Concurrency matching the number of available CPU cores.
    pub fn available_cores() -> Self {
        Self::of(num_cpus::get().max(1))
    }

    /// Returns the concurrency level.
    #[inline]
    pub fn value(&self) -> usize {
        self.value.get()
    }
}

impl Default for Concurrency {
    fn default() -> Self {
        Self::available_cores()
    }
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
