//! Atomic numeric arrays for concurrent load phases.

pub mod huge_atomic_long_array;

pub use huge_atomic_long_array::HugeAtomicLongArray;
