//! Degree-of-parallelism plumbing for the load and finalize phases.
//!
//! The core itself has no suspension points: everything is synchronous and
//! CPU-bound. A [`Concurrency`] value is a hint that sizes partitions and
//! batches; the actual workers come from rayon's pool.

pub mod concurrency_level;
pub mod parallel;
pub mod partition;

pub use concurrency_level::Concurrency;
pub use parallel::parallel_for_each_partition;
pub use partition::{Partition, PartitionUtils};
