//! Adjacency compression.
//!
//! Targets are stored per source as delta-encoded, zigzag-mapped,
//! variable-length integers. Accumulation happens concurrently during load;
//! [`AdjacencyCompressor::drain`] hands the packed byte streams over to the
//! finished graph in ascending source order.

pub mod adjacency_compressor;
pub mod paired_sort;
pub mod vlong;

pub use adjacency_compressor::{AdjacencyCompressor, DrainedSource};
pub use vlong::{decode_vlong, encode_vlong, encoded_vlong_length, unzigzag, zigzag};

/// Out-of-band sentinel a producer uses to flag pre-aggregated targets.
///
/// Flagged targets are skipped in both the byte stream and the property
/// columns. Distinct from the lookup sentinel
/// [`NOT_FOUND`](crate::types::id_map::NOT_FOUND).
pub const IGNORE_VALUE: i64 = i64::MIN;
