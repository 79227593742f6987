//! Rayon-backed execution of partitioned work.

use crate::concurrency::{Concurrency, Partition, PartitionUtils};
use rayon::prelude::*;

/// Runs `task` once per partition of `[0, node_count)`, in parallel.
///
/// Partition boundaries derive from `concurrency`; execution happens on
/// rayon's pool. Blocks until every partition has been processed.
pub fn parallel_for_each_partition<F>(node_count: usize, concurrency: Concurrency, task: F)
where
    F: Fn(Partition) + Send + Sync,
{
    if node_count == 0 {
        return;
    }
    let partitions = PartitionUtils::range_partition(concurrency, node_count);
    partitions.into_par_iter().for_each(task);
}
