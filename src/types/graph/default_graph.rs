//! Read-only graph assembled from the finalized loading artifacts.
//!
//! Owns the id map, the compressed topology, both property stores, and the
//! schema. Cursors handed out here borrow the graph's storage; they must
//! not outlive it, which the borrow checker enforces.

use crate::types::adj_list::{AdjacencyCursor, AdjacencyList, WeightedAdjacencyCursor};
use crate::types::id_map::{ArrayIdMap, IdMap, MappedNodeId, OriginalNodeId};
use crate::types::properties::{NodePropertyStore, RelationshipPropertyStore};
use crate::types::schema::{GraphSchema, NodeLabel, RelationshipType};
use std::sync::Arc;

/// An immutable graph: dense ids, compressed adjacency, typed properties.
pub struct DefaultGraph {
    id_map: Arc<ArrayIdMap>,
    topology: Arc<AdjacencyList>,
    schema: GraphSchema,
    node_properties: NodePropertyStore,
    relationship_properties: RelationshipPropertyStore,
}

impl DefaultGraph {
    pub fn new(
        id_map: Arc<ArrayIdMap>,
        topology: Arc<AdjacencyList>,
        schema: GraphSchema,
        node_properties: NodePropertyStore,
        relationship_properties: RelationshipPropertyStore,
    ) -> Self {
        debug_assert_eq!(id_map.node_count(), topology.node_count());
        Self {
            id_map,
            topology,
            schema,
            node_properties,
            relationship_properties,
        }
    }

    pub fn node_count(&self) -> usize {
        self.id_map.node_count()
    }

    pub fn relationship_count(&self) -> usize {
        self.topology.relationship_count()
    }

    pub fn schema(&self) -> &GraphSchema {
        &self.schema
    }

    pub fn id_map(&self) -> &Arc<ArrayIdMap> {
        &self.id_map
    }

    pub fn topology(&self) -> &Arc<AdjacencyList> {
        &self.topology
    }

    pub fn node_properties(&self) -> &NodePropertyStore {
        &self.node_properties
    }

    pub fn relationship_properties(&self) -> &RelationshipPropertyStore {
        &self.relationship_properties
    }

    pub fn to_mapped_node_id(&self, original_id: OriginalNodeId) -> i64 {
        self.id_map.to_mapped_node_id(original_id)
    }

    pub fn to_original_node_id(&self, mapped_id: MappedNodeId) -> OriginalNodeId {
        self.id_map.to_original_node_id(mapped_id)
    }

    pub fn has_label(&self, mapped_id: MappedNodeId, label: &NodeLabel) -> bool {
        self.id_map.has_label(mapped_id, label)
    }

    pub fn degree(&self, node: MappedNodeId) -> usize {
        self.topology.degree(node)
    }

    pub fn is_undirected_for_type(&self, rel_type: &RelationshipType) -> bool {
        self.schema.is_undirected_for_type(rel_type)
    }

    /// A cursor positioned at the start of `node`'s adjacency list.
    pub fn adjacency_cursor(&self, node: MappedNodeId) -> AdjacencyCursor<'_> {
        self.topology.adjacency_cursor(node)
    }

    /// A paired (target, property) cursor for one relationship property, or
    /// `None` when the key is not stored.
    pub fn weighted_adjacency_cursor(
        &self,
        node: MappedNodeId,
        property_key: &str,
    ) -> Option<WeightedAdjacencyCursor<'_>> {
        let property = self.relationship_properties.get(property_key)?;
        Some(WeightedAdjacencyCursor::new(
            self.topology.adjacency_cursor(node),
            property.values().property_cursor(node),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concurrency::Concurrency;
    use crate::core::compress::AdjacencyCompressor;
    use crate::core::loading::NodesBuilder;
    use crate::types::properties::RelationshipProperty;
    use crate::types::schema::{
        Direction, MutableGraphSchema, RelationshipPropertySchema, ValueType,
    };
    use std::collections::HashMap;

    fn tiny_graph() -> DefaultGraph {
        let nodes = NodesBuilder::new(3, Concurrency::of(1)).unwrap();
        for original in [100i64, 200, 300] {
            nodes.add_node(original, &[NodeLabel::of("N")]).unwrap();
        }
        let built = nodes.build(None, Concurrency::of(1)).unwrap();
        let id_map = Arc::new(built.id_map);

        let compressor = AdjacencyCompressor::new(3, 1);
        compressor
            .add_with_properties(0, &[1, 2], &[&[12, 13]], 2)
            .unwrap();
        compressor
            .add_with_properties(1, &[2], &[&[23]], 1)
            .unwrap();
        let (topology, mut columns) = AdjacencyList::from_compressor(&compressor, 3).unwrap();

        let mut relationship_properties = HashMap::new();
        relationship_properties.insert(
            "weight".to_string(),
            RelationshipProperty::new(
                Arc::new(columns.remove(0)),
                RelationshipPropertySchema::of("weight", ValueType::Long),
            ),
        );

        let mut schema = MutableGraphSchema::empty();
        schema.node_schema_mut().add_label(NodeLabel::of("N"));
        schema.relationship_schema_mut().add_property(
            RelationshipType::of("R"),
            Direction::Directed,
            "weight",
            RelationshipPropertySchema::of("weight", ValueType::Long),
        );

        DefaultGraph::new(
            id_map,
            Arc::new(topology),
            schema.build(),
            built.properties,
            RelationshipPropertyStore::new(relationship_properties),
        )
    }

    #[test]
    fn test_counts_and_lookups() {
        let graph = tiny_graph();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.relationship_count(), 3);
        assert_eq!(graph.to_mapped_node_id(200), 1);
        assert_eq!(graph.to_original_node_id(1), 200);
        assert!(graph.has_label(0, &NodeLabel::of("N")));
        assert_eq!(graph.degree(0), 2);
        assert_eq!(graph.degree(2), 0);
    }

    #[test]
    fn test_cursor_access() {
        let graph = tiny_graph();
        let mut cursor = graph.adjacency_cursor(0);
        assert_eq!(cursor.next(), 1);
        assert_eq!(cursor.next(), 2);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_weighted_cursor_access() {
        let graph = tiny_graph();
        let mut cursor = graph.weighted_adjacency_cursor(0, "weight").unwrap();
        let first = cursor.next();
        assert_eq!((first.target, first.weight_bits), (1, 12));
        let second = cursor.next();
        assert_eq!((second.target, second.weight_bits), (2, 13));
        assert_eq!(cursor.remaining(), 0);

        assert!(graph.weighted_adjacency_cursor(0, "missing").is_none());
    }

    #[test]
    fn test_direction_check() {
        let graph = tiny_graph();
        assert!(!graph.is_undirected_for_type(&RelationshipType::of("R")));
        assert!(!graph.is_undirected_for_type(&RelationshipType::of("ABSENT")));
    }
}
