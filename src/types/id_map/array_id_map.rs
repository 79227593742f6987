//! Array-backed root id mapping.
//!
//! Forward lookup (internal→original) is one dense array read. Reverse
//! lookup (original→internal) goes through a sparse paged array whose pages
//! exist only for original-id ranges that were actually touched.

use crate::collections::huge_sparse_array::huge_sparse_long_array::PAGE_SIZE as SPARSE_PAGE_SIZE;
use crate::collections::{HugeLongArray, HugeSparseLongArray};
use crate::concurrency::{parallel_for_each_partition, Concurrency};
use crate::core::loading::{LabelInformation, LoadingResult};
use crate::mem::{BitUtil, Estimate, MemoryRange};
use crate::types::id_map::batch_node_iterable::batches_of;
use crate::types::id_map::{
    FilteredIdMap, IdMap, MappedNodeId, NodeIdBatch, OriginalNodeId, NOT_FOUND,
};
use crate::types::schema::NodeLabel;
use std::collections::HashSet;

/// The root id mapping of a graph.
pub struct ArrayIdMap {
    forward: HugeLongArray,
    reverse: HugeSparseLongArray,
    labels: Box<dyn LabelInformation>,
    node_count: usize,
    highest_original_id: OriginalNodeId,
}

impl ArrayIdMap {
    pub(crate) fn new(
        forward: HugeLongArray,
        reverse: HugeSparseLongArray,
        labels: Box<dyn LabelInformation>,
        node_count: usize,
        highest_original_id: OriginalNodeId,
    ) -> Self {
        Self {
            forward,
            reverse,
            labels,
            node_count,
            highest_original_id,
        }
    }

    /// Best/worst-case size projection for capacity planning.
    ///
    /// The spread comes from the sparse reverse map: in the best case the
    /// original ids cluster and only `node_count / page_size` value pages
    /// exist; in the worst case every populated page holds a single entry.
    pub fn estimate_memory(
        node_count: usize,
        highest_original_id: i64,
        label_count: usize,
    ) -> MemoryRange {
        let reverse_domain = if highest_original_id < 0 {
            0
        } else {
            highest_original_id as usize + 1
        };
        let top_level_pages = HugeSparseLongArray::page_count_for(reverse_domain);
        let page_bytes = Estimate::size_of_long_array(SPARSE_PAGE_SIZE);

        let forward = Estimate::size_of_long_array(node_count);
        let reverse_top = Estimate::size_of_object_array(top_level_pages);
        let labels = label_count * Estimate::size_of_bitset(node_count);
        let fixed = forward + reverse_top + labels;

        let best_pages = BitUtil::ceil_div(node_count, SPARSE_PAGE_SIZE).min(top_level_pages);
        let worst_pages = node_count.min(top_level_pages);
        MemoryRange::of_range(
            fixed + best_pages * page_bytes,
            fixed + worst_pages * page_bytes,
        )
    }

    /// The frozen label membership backing this map.
    pub fn label_information(&self) -> &dyn LabelInformation {
        self.labels.as_ref()
    }

    /// Fails when any of the given labels has no stored membership.
    pub fn validate_node_labels(&self, labels: &HashSet<NodeLabel>) -> LoadingResult<()> {
        self.labels.validate_node_labels(labels)
    }

    /// Builds a filtered view restricted to nodes carrying any of `labels`.
    ///
    /// Returns `Ok(None)` when the union of the requested labels is empty.
    /// Unknown labels fail validation instead of yielding an empty view.
    /// The view borrows this map and cannot outlive it.
    pub fn with_filtered_labels(
        &self,
        labels: &HashSet<NodeLabel>,
        concurrency: Concurrency,
    ) -> LoadingResult<Option<FilteredIdMap<'_>>> {
        self.labels.validate_node_labels(labels)?;

        let union = self.labels.union_bit_set(labels, self.node_count);
        let filtered_count = union.cardinality();
        if filtered_count == 0 {
            return Ok(None);
        }
        log::debug!(
            "building filtered id map over {} of {} nodes",
            filtered_count,
            self.node_count
        );

        // Filtered ids are assigned in ascending root id order.
        let mut to_root = HugeLongArray::new(filtered_count);
        for (filtered_id, root_id) in union.iter().enumerate() {
            to_root.set(filtered_id, root_id as i64);
        }

        let from_root = HugeSparseLongArray::builder(self.node_count, NOT_FOUND);
        {
            let from_root = &from_root;
            let to_root = &to_root;
            parallel_for_each_partition(filtered_count, concurrency, move |partition| {
                for filtered_id in partition.iter() {
                    from_root.set(to_root.get(filtered_id) as usize, filtered_id as i64);
                }
            });
        }

        Ok(Some(FilteredIdMap::new(
            self,
            to_root,
            from_root.build(),
            filtered_count,
        )))
    }
}

impl IdMap for ArrayIdMap {
    fn to_mapped_node_id(&self, original_id: OriginalNodeId) -> i64 {
        if original_id < 0 {
            return NOT_FOUND;
        }
        self.reverse.get(original_id as usize)
    }

    fn to_original_node_id(&self, mapped_id: MappedNodeId) -> OriginalNodeId {
        self.forward.get(mapped_id as usize)
    }

    fn node_count(&self) -> usize {
        self.node_count
    }

    fn node_count_for_label(&self, label: &NodeLabel) -> usize {
        self.labels.node_count_for_label(label)
    }

    fn highest_original_id(&self) -> OriginalNodeId {
        self.highest_original_id
    }

    fn has_label(&self, mapped_id: MappedNodeId, label: &NodeLabel) -> bool {
        self.labels.has_label(mapped_id, label)
    }

    fn available_node_labels(&self) -> HashSet<NodeLabel> {
        self.labels.available_node_labels()
    }

    fn iter_nodes(&self) -> Box<dyn Iterator<Item = MappedNodeId> + '_> {
        Box::new(0..self.node_count as MappedNodeId)
    }

    fn iter_nodes_with_labels(
        &self,
        labels: &HashSet<NodeLabel>,
    ) -> Box<dyn Iterator<Item = MappedNodeId> + '_> {
        self.labels.node_iterator(labels, self.node_count)
    }

    fn batch_iterables(&self, batch_size: usize) -> Vec<NodeIdBatch> {
        batches_of(self.node_count, batch_size)
    }
}
