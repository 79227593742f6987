//! Relationship property storage, keyed by edge ordinal.

use crate::types::adj_list::{AdjacencyList, AdjacencyProperties};
use crate::types::id_map::{MappedNodeId, NOT_FOUND};
use crate::types::schema::{RelationshipPropertySchema, ValueType};
use std::collections::HashMap;
use std::sync::Arc;

/// Read access to one relationship property.
///
/// Lookup by `(source, target)` pair is a convenience for consumers without
/// an edge ordinal at hand; it walks the source's adjacency list and is not
/// O(1). Performance-critical access goes through
/// [`AdjacencyProperties::property_cursor`] instead.
pub trait RelationshipProperties: Send + Sync {
    /// The value returned when no stored value applies.
    fn default_property_value(&self) -> f64;

    /// The value of the first `source → target` relationship, or `fallback`
    /// when the edge does not exist.
    fn relationship_property(
        &self,
        source: MappedNodeId,
        target: MappedNodeId,
        fallback: f64,
    ) -> f64;
}

/// Every relationship has the same value.
pub struct ConstantRelationshipProperties {
    value: f64,
}

impl ConstantRelationshipProperties {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl RelationshipProperties for ConstantRelationshipProperties {
    fn default_property_value(&self) -> f64 {
        self.value
    }

    fn relationship_property(&self, _: MappedNodeId, _: MappedNodeId, _: f64) -> f64 {
        self.value
    }
}

/// No stored values; every lookup yields the fallback.
pub struct EmptyRelationshipProperties;

impl RelationshipProperties for EmptyRelationshipProperties {
    fn default_property_value(&self) -> f64 {
        0.0
    }

    fn relationship_property(&self, _: MappedNodeId, _: MappedNodeId, fallback: f64) -> f64 {
        fallback
    }
}

/// Values backed by an adjacency property column; the target's edge ordinal
/// is found by advancing a cursor over the source's adjacency list.
pub struct CursorRelationshipProperties {
    adjacency: Arc<AdjacencyList>,
    values: Arc<AdjacencyProperties>,
    value_type: ValueType,
}

impl CursorRelationshipProperties {
    pub fn new(
        adjacency: Arc<AdjacencyList>,
        values: Arc<AdjacencyProperties>,
        value_type: ValueType,
    ) -> Self {
        Self {
            adjacency,
            values,
            value_type,
        }
    }

    fn read_value(&self, bits: i64) -> f64 {
        match self.value_type {
            ValueType::Double => f64::from_bits(bits as u64),
            _ => bits as f64,
        }
    }
}

impl RelationshipProperties for CursorRelationshipProperties {
    fn default_property_value(&self) -> f64 {
        0.0
    }

    fn relationship_property(
        &self,
        source: MappedNodeId,
        target: MappedNodeId,
        fallback: f64,
    ) -> f64 {
        let mut cursor = self.adjacency.adjacency_cursor(source);
        if cursor.remaining() == 0 {
            return fallback;
        }
        let (found, consumed) = cursor.advance(target as i64);
        if found == NOT_FOUND || found != target as i64 {
            return fallback;
        }

        let ordinal = consumed - 1;
        let mut property_cursor = self.values.property_cursor(source);
        for _ in 0..ordinal {
            property_cursor.next_value();
        }
        self.read_value(property_cursor.next_value())
    }
}

/// One relationship property: its value column plus its schema.
#[derive(Clone)]
pub struct RelationshipProperty {
    values: Arc<AdjacencyProperties>,
    schema: RelationshipPropertySchema,
}

impl RelationshipProperty {
    pub fn new(values: Arc<AdjacencyProperties>, schema: RelationshipPropertySchema) -> Self {
        Self { values, schema }
    }

    pub fn values(&self) -> &Arc<AdjacencyProperties> {
        &self.values
    }

    pub fn schema(&self) -> &RelationshipPropertySchema {
        &self.schema
    }
}

/// Keyed collection of relationship properties.
#[derive(Clone, Default)]
pub struct RelationshipPropertyStore {
    properties: HashMap<String, RelationshipProperty>,
}

impl RelationshipPropertyStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(properties: HashMap<String, RelationshipProperty>) -> Self {
        Self { properties }
    }

    pub fn get(&self, key: &str) -> Option<&RelationshipProperty> {
        self.properties.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.properties.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &RelationshipProperty> {
        self.properties.values()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// A store holding only the given key; empty if the key is absent.
    pub fn filter(&self, key: &str) -> RelationshipPropertyStore {
        match self.properties.get(key) {
            Some(property) => {
                let mut kept = HashMap::new();
                kept.insert(key.to_string(), property.clone());
                RelationshipPropertyStore::new(kept)
            }
            None => RelationshipPropertyStore::empty(),
        }
    }
}
