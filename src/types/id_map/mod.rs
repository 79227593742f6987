//! Bidirectional original↔internal node id mapping.
//!
//! Internal ids are dense and zero-based; original ids are whatever the
//! producer supplied. Lookups that can miss return a signed id-or-sentinel
//! value; [`NOT_FOUND`] stays unambiguous because original ids are required
//! to be non-negative at ingestion.

pub mod array_id_map;
pub mod batch_node_iterable;
pub mod filtered_id_map;

pub use array_id_map::ArrayIdMap;
pub use batch_node_iterable::{NodeIdBatch, NodeIdBatchIter};
pub use filtered_id_map::FilteredIdMap;

use crate::types::schema::NodeLabel;
use std::collections::HashSet;

/// Dense, zero-based internal node id.
pub type MappedNodeId = u64;

/// Producer-supplied node id. Non-negative for every ingested node.
pub type OriginalNodeId = i64;

/// Sentinel for failed lookups. Never a valid original or internal id.
pub const NOT_FOUND: i64 = -1;

/// The first internal id of every mapping.
pub const START_NODE_ID: MappedNodeId = 0;

/// Bidirectional id mapping with label membership queries.
///
/// Implemented by [`ArrayIdMap`] (the root mapping) and [`FilteredIdMap`]
/// (a label-restricted view composed over a root map).
pub trait IdMap: Send + Sync {
    /// Maps an original id to its internal id, or [`NOT_FOUND`].
    fn to_mapped_node_id(&self, original_id: OriginalNodeId) -> i64;

    /// Maps an internal id back to its original id.
    ///
    /// `mapped_id` must be in `[0, node_count)`; out-of-range lookups are a
    /// caller bug and panic.
    fn to_original_node_id(&self, mapped_id: MappedNodeId) -> OriginalNodeId;

    /// True when the original id was ingested.
    fn contains_original_id(&self, original_id: OriginalNodeId) -> bool {
        self.to_mapped_node_id(original_id) != NOT_FOUND
    }

    /// Total number of mapped nodes.
    fn node_count(&self) -> usize;

    /// Number of nodes carrying `label`; unknown labels count zero.
    fn node_count_for_label(&self, label: &NodeLabel) -> usize;

    /// The largest original id in the mapping, or [`NOT_FOUND`] when empty.
    fn highest_original_id(&self) -> OriginalNodeId;

    /// Label membership for one node.
    fn has_label(&self, mapped_id: MappedNodeId, label: &NodeLabel) -> bool;

    /// The labels known to this mapping.
    fn available_node_labels(&self) -> HashSet<NodeLabel>;

    /// Restartable ascending iteration over all internal ids.
    fn iter_nodes(&self) -> Box<dyn Iterator<Item = MappedNodeId> + '_>;

    /// Restartable ascending iteration over internal ids carrying any of the
    /// given labels.
    fn iter_nodes_with_labels(
        &self,
        labels: &HashSet<NodeLabel>,
    ) -> Box<dyn Iterator<Item = MappedNodeId> + '_>;

    /// Ascending half-open ranges partitioning `[0, node_count)`.
    fn batch_iterables(&self, batch_size: usize) -> Vec<NodeIdBatch>;
}
