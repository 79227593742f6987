//! Dense, fixed-size numeric arrays with paged backing storage.

pub mod huge_double_array;
pub mod huge_long_array;

pub use huge_double_array::HugeDoubleArray;
pub use huge_long_array::HugeLongArray;
