//! Sparse paged arrays with lazily allocated value pages.

pub mod huge_sparse_long_array;

pub use huge_sparse_long_array::{HugeSparseLongArray, HugeSparseLongArrayBuilder};
