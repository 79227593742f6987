//! Range partitioning of the internal id domain.
//!
//! Finalize work (reverse-map fill, bitset freezing) is split into
//! contiguous `[start, start + count)` partitions that workers process
//! independently. Partitions are always ascending and disjoint.

use crate::concurrency::Concurrency;
use crate::mem::BitUtil;

/// Default minimum batch size for parallel processing.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// A contiguous half-open range of ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    start: usize,
    count: usize,
}

impl Partition {
    pub fn new(start: usize, count: usize) -> Self {
        Self { start, count }
    }

    pub fn start_node(&self) -> usize {
        self.start
    }

    pub fn node_count(&self) -> usize {
        self.count
    }

    /// Iterates the ids covered by this partition in ascending order.
    pub fn iter(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.count
    }
}

/// Partitioning strategies over a dense id domain.
pub struct PartitionUtils;

impl PartitionUtils {
    /// Splits `[0, node_count)` into ascending partitions of roughly equal
    /// size, one batch per worker where the domain is large enough.
    pub fn range_partition(concurrency: Concurrency, node_count: usize) -> Vec<Partition> {
        let batch_size =
            Self::adjusted_batch_size(node_count, concurrency, DEFAULT_BATCH_SIZE);
        Self::range_partition_with_batch_size(node_count, batch_size)
    }

    /// Splits `[0, node_count)` into ascending partitions of `batch_size`
    /// elements; the last partition takes the remainder.
    pub fn range_partition_with_batch_size(
        node_count: usize,
        batch_size: usize,
    ) -> Vec<Partition> {
        debug_assert!(batch_size > 0, "batch size must be positive");
        let mut partitions = Vec::with_capacity(BitUtil::ceil_div(node_count, batch_size));
        let mut start = 0;
        while start < node_count {
            let count = batch_size.min(node_count - start);
            partitions.push(Partition::new(start, count));
            start += count;
        }
        partitions
    }

    /// Batch size that spreads `node_count` over `concurrency` workers but
    /// never drops below `min_batch_size`.
    pub fn adjusted_batch_size(
        node_count: usize,
        concurrency: Concurrency,
        min_batch_size: usize,
    ) -> usize {
        BitUtil::ceil_div(node_count.max(1), concurrency.value()).max(min_batch_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_partition_covers_domain() {
        let partitions = PartitionUtils::range_partition_with_batch_size(1000, 300);
        assert_eq!(partitions.len(), 4);
        assert_eq!(partitions[0], Partition::new(0, 300));
        assert_eq!(partitions[3], Partition::new(900, 100));

        let total: usize = partitions.iter().map(|p| p.node_count()).sum();
        assert_eq!(total, 1000);
    }

    #[test]
    fn test_partitions_are_ascending_and_disjoint() {
        let partitions = PartitionUtils::range_partition_with_batch_size(10_000, 1234);
        for pair in partitions.windows(2) {
            assert_eq!(pair[0].start_node() + pair[0].node_count(), pair[1].start_node());
        }
    }

    #[test]
    fn test_empty_domain() {
        assert!(PartitionUtils::range_partition_with_batch_size(0, 100).is_empty());
    }

    #[test]
    fn test_adjusted_batch_size_respects_minimum() {
        let batch = PartitionUtils::adjusted_batch_size(100, Concurrency::of(8), 10_000);
        assert_eq!(batch, 10_000);
    }

    #[test]
    fn test_adjusted_batch_size_spreads_work() {
        let batch = PartitionUtils::adjusted_batch_size(1_000_000, Concurrency::of(4), 10);
        assert_eq!(batch, 250_000);
    }

    #[test]
    fn test_partition_iter() {
        let partition = Partition::new(5, 3);
        assert_eq!(partition.iter().collect::<Vec<_>>(), vec![5, 6, 7]);
    }
}
