//! Forward-array id map construction.
//!
//! Builder threads reserve disjoint internal id ranges with one `fetch_add`
//! on a shared counter, then write original ids into their range without any
//! further coordination. Finalize scans the forward array, sizes the sparse
//! reverse map, and fills it in parallel partitions over the internal id
//! domain. Partitions write disjoint original ids because internal ids are
//! unique.

use crate::collections::huge_sparse_array::huge_sparse_long_array::PAGE_SIZE as SPARSE_PAGE_SIZE;
use crate::collections::{HugeAtomicLongArray, HugeSparseLongArray};
use crate::concurrency::{parallel_for_each_partition, Concurrency};
use crate::core::loading::{LabelInformationBuilder, LoadingError, LoadingResult};
use crate::types::id_map::{ArrayIdMap, OriginalNodeId, NOT_FOUND};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Concurrent builder for [`ArrayIdMap`] when the producer guarantees
/// distinct original ids.
///
/// For producers that may repeat ids, use
/// [`NodesBuilder`](crate::core::loading::NodesBuilder), which deduplicates
/// through a sharded map before writing the forward array.
pub struct ArrayIdMapBuilder {
    array: HugeAtomicLongArray,
    allocation_index: AtomicUsize,
}

impl ArrayIdMapBuilder {
    /// Creates a builder that can hold up to `capacity` nodes.
    pub fn new(capacity: usize) -> Self {
        Self {
            array: HugeAtomicLongArray::new(capacity),
            allocation_index: AtomicUsize::new(0),
        }
    }

    /// Reserves a range of `batch_length` internal ids for the calling
    /// thread. This is the only synchronization point on the hot path.
    pub fn allocate(&self, batch_length: usize) -> IdMapAllocator<'_> {
        let start = self.allocation_index.fetch_add(batch_length, Ordering::AcqRel);
        debug_assert!(
            start + batch_length <= self.array.size(),
            "allocation exceeds builder capacity"
        );
        IdMapAllocator {
            array: &self.array,
            start,
            length: batch_length,
        }
    }

    /// Number of internal ids assigned so far.
    pub fn size(&self) -> usize {
        self.allocation_index.load(Ordering::SeqCst)
    }

    /// Finalizes into an [`ArrayIdMap`].
    pub fn build(
        self,
        label_builder: LabelInformationBuilder,
        highest_original_id: Option<OriginalNodeId>,
        concurrency: Concurrency,
    ) -> LoadingResult<ArrayIdMap> {
        let node_count = self.size();
        finalize_id_map(
            self.array,
            node_count,
            label_builder,
            highest_original_id,
            concurrency,
        )
    }
}

/// A thread-private range of internal ids handed out by the builder.
pub struct IdMapAllocator<'a> {
    array: &'a HugeAtomicLongArray,
    start: usize,
    length: usize,
}

impl<'a> IdMapAllocator<'a> {
    /// First internal id of the reserved range.
    pub fn start_id(&self) -> usize {
        self.start
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Writes the batch of original ids into the reserved range.
    ///
    /// # Panics
    ///
    /// Panics if the batch length does not match the reservation.
    pub fn insert(&self, original_ids: &[OriginalNodeId]) {
        assert_eq!(
            original_ids.len(),
            self.length,
            "batch length does not match the reserved range"
        );
        for (offset, &original_id) in original_ids.iter().enumerate() {
            self.array.set(self.start + offset, original_id);
        }
    }
}

/// Shared finalize path: freeze the forward array, derive the highest
/// original id, build and fill the sparse reverse map, freeze labels.
pub(crate) fn finalize_id_map(
    forward: HugeAtomicLongArray,
    node_count: usize,
    label_builder: LabelInformationBuilder,
    declared_highest_id: Option<OriginalNodeId>,
    concurrency: Concurrency,
) -> LoadingResult<ArrayIdMap> {
    let forward = forward.into_huge_long_array(node_count);

    let highest_original_id = match declared_highest_id {
        Some(id) => id,
        None => forward.max().unwrap_or(NOT_FOUND),
    };

    let reverse_capacity = if highest_original_id < 0 {
        0
    } else {
        highest_original_id as usize + 1
    };
    let pages = HugeSparseLongArray::page_count_for(reverse_capacity);
    if pages > i32::MAX as usize {
        return Err(LoadingError::TooManyPages {
            nodes: node_count,
            pages,
            page_size: SPARSE_PAGE_SIZE,
        });
    }

    log::debug!(
        "finalizing id map: {} nodes, highest original id {}, {} reverse pages",
        node_count,
        highest_original_id,
        pages
    );

    let reverse_builder = HugeSparseLongArray::builder(reverse_capacity, NOT_FOUND);
    {
        let forward = &forward;
        let reverse_builder = &reverse_builder;
        parallel_for_each_partition(node_count, concurrency, move |partition| {
            for internal_id in partition.iter() {
                reverse_builder.set(forward.get(internal_id) as usize, internal_id as i64);
            }
        });
    }

    let labels = label_builder.build(node_count, |import_id| import_id);

    Ok(ArrayIdMap::new(
        forward,
        reverse_builder.build(),
        labels,
        node_count,
        highest_original_id,
    ))
}
