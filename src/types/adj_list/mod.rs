//! Compressed adjacency storage and its cursors.
//!
//! [`AdjacencyList`] owns the packed byte streams produced by draining the
//! compressor, plus per-source offsets and degrees. [`AdjacencyCursor`]
//! decompresses a source's targets in fixed-size blocks and supports
//! skip-ahead traversal; [`PropertyCursor`] walks the parallel property
//! columns by edge ordinal.

pub mod adjacency_cursor;
pub mod adjacency_list;
pub mod adjacency_properties;
pub mod weighted_adjacency_cursor;

pub use adjacency_cursor::AdjacencyCursor;
pub use adjacency_list::{AdjacencyList, AdjacencyListBuilder};
pub use adjacency_properties::{AdjacencyProperties, AdjacencyPropertiesBuilder, PropertyCursor};
pub use weighted_adjacency_cursor::{WeightedAdjacencyCursor, WeightedTarget};

/// Number of targets a cursor decodes per block.
///
/// 64 targets give 512 bytes of decoded payload, one cache line of cursor
/// state, and a 6-step binary search within the block.
pub const BLOCK_SIZE: usize = 64;
