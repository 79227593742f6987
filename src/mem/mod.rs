//! Memory primitives: bit arithmetic, size estimation, estimate ranges.
//!
//! Everything that plans capacity (page layouts, huge array sizing, the
//! compressor's best/worst-case projections) goes through this module.

pub mod bit_util;
pub mod estimate;
pub mod memory_range;

pub use bit_util::BitUtil;
pub use estimate::Estimate;
pub use memory_range::MemoryRange;
