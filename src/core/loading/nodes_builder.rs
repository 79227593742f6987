//! Node ingestion surface.
//!
//! Accepts original ids, labels, and node properties from many producer
//! threads, deduplicates ids through the sharded map, and finalizes into the
//! root id map plus a node property store and node schema.

use crate::collections::HugeAtomicLongArray;
use crate::concurrency::Concurrency;
use crate::core::loading::array_id_map_builder::finalize_id_map;
use crate::core::loading::{
    ImportSizing, LabelInformationBuilder, LoadingError, LoadingResult, ShardedIdMapBuilder,
};
use crate::types::id_map::{ArrayIdMap, OriginalNodeId};
use crate::types::properties::{
    NodeProperty, NodePropertyStore, NodePropertyValues, PropertyValue,
};
use crate::types::schema::{MutableNodeSchema, NodeLabel, NodeSchema, PropertySchema};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

struct PropertyColumn {
    bits: Arc<HugeAtomicLongArray>,
    value_type: crate::types::schema::ValueType,
}

/// Everything the node loading phase produces.
pub struct BuiltNodes {
    pub id_map: ArrayIdMap,
    pub properties: NodePropertyStore,
    pub schema: NodeSchema,
}

/// Concurrent builder for the node side of a graph.
///
/// Ingestion is idempotent: re-adding an original id returns the existing
/// internal id and does not grow the map. Property writes for a re-added
/// node overwrite (last write wins).
pub struct NodesBuilder {
    id_map_builder: ShardedIdMapBuilder,
    forward: HugeAtomicLongArray,
    labels: LabelInformationBuilder,
    properties: RwLock<HashMap<String, PropertyColumn>>,
    schema: RwLock<MutableNodeSchema>,
    capacity: usize,
}

impl NodesBuilder {
    /// Creates a builder that can hold up to `capacity` distinct nodes.
    ///
    /// Fails when no valid page layout covers the capacity.
    pub fn new(capacity: usize, concurrency: Concurrency) -> LoadingResult<Self> {
        let sizing = ImportSizing::of(concurrency, capacity)?;
        log::debug!(
            "node builder over {} pages for up to {} nodes",
            sizing.number_of_pages(),
            capacity
        );
        Ok(Self {
            id_map_builder: ShardedIdMapBuilder::new(concurrency),
            forward: HugeAtomicLongArray::new(capacity),
            labels: LabelInformationBuilder::new(capacity),
            properties: RwLock::new(HashMap::new()),
            schema: RwLock::new(MutableNodeSchema::empty()),
            capacity,
        })
    }

    /// Adds a node, returning its internal id.
    ///
    /// Negative original ids are rejected. Safe to call from many threads.
    pub fn add_node(
        &self,
        original_id: OriginalNodeId,
        labels: &[NodeLabel],
    ) -> LoadingResult<i64> {
        if original_id < 0 {
            return Err(LoadingError::NegativeId { id: original_id });
        }

        let assigned = self.id_map_builder.add_node(original_id);
        let internal_id = if assigned >= 0 {
            debug_assert!(
                (assigned as usize) < self.capacity,
                "builder capacity exceeded"
            );
            self.forward.set(assigned as usize, original_id);
            assigned
        } else {
            -assigned - 1
        };

        if !labels.is_empty() {
            for label in labels {
                self.labels.add(label, internal_id as usize);
            }
            let mut schema = self.schema.write();
            for label in labels {
                if !label.is_all_nodes() {
                    schema.add_label(label.clone());
                }
            }
        }

        Ok(internal_id)
    }

    /// Adds a node together with property values.
    pub fn add_node_with_properties(
        &self,
        original_id: OriginalNodeId,
        labels: &[NodeLabel],
        properties: &[(&str, PropertyValue)],
    ) -> LoadingResult<i64> {
        let internal_id = self.add_node(original_id, labels)?;

        for &(key, value) in properties {
            let column = self.property_column(key, value);
            column.set(internal_id as usize, value.to_bits());

            let mut schema = self.schema.write();
            for label in labels {
                if !label.is_all_nodes() {
                    schema.add_property(
                        label.clone(),
                        key.to_string(),
                        PropertySchema::of(key.to_string(), value.value_type()),
                    );
                }
            }
        }

        Ok(internal_id)
    }

    /// Marks the end of a producer's batch.
    ///
    /// All writes go through immediately, so this only emits a trace marker;
    /// producers that stage their own buffers call it between batches.
    pub fn prepare_for_flush(&self) {
        log::trace!(
            "flush requested with {} nodes ingested",
            self.id_map_builder.size()
        );
    }

    /// Number of distinct nodes ingested so far.
    pub fn node_count(&self) -> usize {
        self.id_map_builder.size()
    }

    /// Finalizes into the id map, node property store, and node schema.
    ///
    /// `highest_original_id` skips the finalize-time scan when the producer
    /// already knows the bound. All producer threads must be done.
    pub fn build(
        self,
        highest_original_id: Option<OriginalNodeId>,
        concurrency: Concurrency,
    ) -> LoadingResult<BuiltNodes> {
        let node_count = self.id_map_builder.size();
        let id_map = finalize_id_map(
            self.forward,
            node_count,
            self.labels,
            highest_original_id,
            concurrency,
        )?;

        let mut properties = HashMap::new();
        for (key, column) in self.properties.into_inner() {
            let bits = Arc::try_unwrap(column.bits)
                .unwrap_or_else(|_| panic!("property column still shared at build time"))
                .into_huge_long_array(node_count);
            let values = match column.value_type {
                crate::types::schema::ValueType::Double => {
                    NodePropertyValues::from_bits(bits.to_vec(), column.value_type)
                }
                _ => NodePropertyValues::Long(bits),
            };
            properties.insert(
                key.clone(),
                NodeProperty::new(values, PropertySchema::of(key, column.value_type)),
            );
        }

        Ok(BuiltNodes {
            id_map,
            properties: NodePropertyStore::new(properties),
            schema: self.schema.into_inner().build(),
        })
    }

    fn property_column(&self, key: &str, value: PropertyValue) -> Arc<HugeAtomicLongArray> {
        {
            let columns = self.properties.read();
            if let Some(column) = columns.get(key) {
                return Arc::clone(&column.bits);
            }
        }
        let mut columns = self.properties.write();
        let column = columns.entry(key.to_string()).or_insert_with(|| {
            PropertyColumn {
                bits: Arc::new(HugeAtomicLongArray::new(self.capacity)),
                value_type: value.value_type(),
            }
        });
        Arc::clone(&column.bits)
    }
}
