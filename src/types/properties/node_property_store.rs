//! Node property storage, keyed by internal node id.

use crate::collections::{HugeDoubleArray, HugeLongArray};
use crate::types::id_map::MappedNodeId;
use crate::types::schema::{PropertySchema, ValueType};
use std::collections::HashMap;
use std::sync::Arc;

/// A dense, typed column of node property values.
pub enum NodePropertyValues {
    Long(HugeLongArray),
    Double(HugeDoubleArray),
}

impl NodePropertyValues {
    /// Builds a typed column from raw 64-bit storage.
    pub fn from_bits(bits: Vec<i64>, value_type: ValueType) -> Self {
        match value_type {
            ValueType::Double => NodePropertyValues::Double(HugeDoubleArray::from_vec(
                bits.into_iter().map(|b| f64::from_bits(b as u64)).collect(),
            )),
            _ => NodePropertyValues::Long(HugeLongArray::from_vec(bits)),
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            NodePropertyValues::Long(_) => ValueType::Long,
            NodePropertyValues::Double(_) => ValueType::Double,
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            NodePropertyValues::Long(values) => values.size(),
            NodePropertyValues::Double(values) => values.size(),
        }
    }

    /// The value for a node as a long; doubles are truncated.
    pub fn long_value(&self, node_id: MappedNodeId) -> i64 {
        match self {
            NodePropertyValues::Long(values) => values.get(node_id as usize),
            NodePropertyValues::Double(values) => values.get(node_id as usize) as i64,
        }
    }

    /// The value for a node as a double; longs are widened.
    pub fn double_value(&self, node_id: MappedNodeId) -> f64 {
        match self {
            NodePropertyValues::Long(values) => values.get(node_id as usize) as f64,
            NodePropertyValues::Double(values) => values.get(node_id as usize),
        }
    }
}

/// One node property: its values plus its schema.
#[derive(Clone)]
pub struct NodeProperty {
    values: Arc<NodePropertyValues>,
    schema: PropertySchema,
}

impl NodeProperty {
    pub fn new(values: NodePropertyValues, schema: PropertySchema) -> Self {
        Self {
            values: Arc::new(values),
            schema,
        }
    }

    pub fn values(&self) -> &NodePropertyValues {
        &self.values
    }

    pub fn schema(&self) -> &PropertySchema {
        &self.schema
    }
}

/// Keyed collection of node properties.
#[derive(Clone, Default)]
pub struct NodePropertyStore {
    properties: HashMap<String, NodeProperty>,
}

impl NodePropertyStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(properties: HashMap<String, NodeProperty>) -> Self {
        Self { properties }
    }

    pub fn get(&self, key: &str) -> Option<&NodeProperty> {
        self.properties.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.properties.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &NodeProperty> {
        self.properties.values()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// A store holding only the given key; empty if the key is absent.
    pub fn filter(&self, key: &str) -> NodePropertyStore {
        match self.properties.get(key) {
            Some(property) => {
                let mut kept = HashMap::new();
                kept.insert(key.to_string(), property.clone());
                NodePropertyStore::new(kept)
            }
            None => NodePropertyStore::empty(),
        }
    }
}
