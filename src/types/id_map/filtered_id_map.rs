//! Label-filtered view over a root id mapping.
//!
//! A filtered map owns two translations and composes them with the root
//! map's: filtered→root through a dense array, root→filtered through a
//! sparse one. It borrows the root map, so the view can never outlive the
//! mapping it refers into.

use crate::collections::{HugeLongArray, HugeSparseLongArray};
use crate::types::id_map::batch_node_iterable::batches_of;
use crate::types::id_map::{
    ArrayIdMap, IdMap, MappedNodeId, NodeIdBatch, OriginalNodeId, NOT_FOUND,
};
use crate::types::schema::NodeLabel;
use std::collections::HashSet;

/// A pure view over a root [`ArrayIdMap`], restricted to a label union.
///
/// Filtered ids are dense and zero-based, assigned in ascending root id
/// order.
pub struct FilteredIdMap<'a> {
    root: &'a ArrayIdMap,
    to_root: HugeLongArray,
    from_root: HugeSparseLongArray,
    node_count: usize,
}

impl<'a> std::fmt::Debug for FilteredIdMap<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilteredIdMap")
            .field("node_count", &self.node_count)
            .finish()
    }
}

impl<'a> FilteredIdMap<'a> {
    pub(crate) fn new(
        root: &'a ArrayIdMap,
        to_root: HugeLongArray,
        from_root: HugeSparseLongArray,
        node_count: usize,
    ) -> Self {
        Self {
            root,
            to_root,
            from_root,
            node_count,
        }
    }

    /// The root mapping this view refers into.
    pub fn root_id_map(&self) -> &ArrayIdMap {
        self.root
    }

    /// Translates a root internal id into this view, or [`NOT_FOUND`] when
    /// the node is outside the filter.
    pub fn to_filtered_node_id(&self, root_node_id: MappedNodeId) -> i64 {
        self.from_root.get(root_node_id as usize)
    }

    /// Translates a filtered id back into the root id domain.
    pub fn to_root_node_id(&self, filtered_node_id: MappedNodeId) -> MappedNodeId {
        self.to_root.get(filtered_node_id as usize) as MappedNodeId
    }

    /// True when the root node is part of this view.
    pub fn contains_root_node_id(&self, root_node_id: MappedNodeId) -> bool {
        self.from_root.contains(root_node_id as usize)
    }
}

impl<'a> IdMap for FilteredIdMap<'a> {
    fn to_mapped_node_id(&self, original_id: OriginalNodeId) -> i64 {
        let root_id = self.root.to_mapped_node_id(original_id);
        if root_id == NOT_FOUND {
            return NOT_FOUND;
        }
        self.from_root.get(root_id as usize)
    }

    fn to_original_node_id(&self, mapped_id: MappedNodeId) -> OriginalNodeId {
        self.root.to_original_node_id(self.to_root_node_id(mapped_id))
    }

    fn node_count(&self) -> usize {
        self.node_count
    }

    fn node_count_for_label(&self, label: &NodeLabel) -> usize {
        if label.is_all_nodes() {
            return self.node_count;
        }
        (0..self.node_count as MappedNodeId)
            .filter(|&filtered_id| self.has_label(filtered_id, label))
            .count()
    }

    fn highest_original_id(&self) -> OriginalNodeId {
        self.root.highest_original_id()
    }

    fn has_label(&self, mapped_id: MappedNodeId, label: &NodeLabel) -> bool {
        self.root.has_label(self.to_root_node_id(mapped_id), label)
    }

    fn available_node_labels(&self) -> HashSet<NodeLabel> {
        self.root.available_node_labels()
    }

    fn iter_nodes(&self) -> Box<dyn Iterator<Item = MappedNodeId> + '_> {
        Box::new(0..self.node_count as MappedNodeId)
    }

    fn iter_nodes_with_labels(
        &self,
        labels: &HashSet<NodeLabel>,
    ) -> Box<dyn Iterator<Item = MappedNodeId> + '_> {
        let labels = labels.clone();
        Box::new(
            (0..self.node_count as MappedNodeId)
                .filter(move |&id| labels.iter().any(|label| self.has_label(id, label))),
        )
    }

    fn batch_iterables(&self, batch_size: usize) -> Vec<NodeIdBatch> {
        batches_of(self.node_count, batch_size)
    }
}
