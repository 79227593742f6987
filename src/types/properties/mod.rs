//! Typed columnar property storage.
//!
//! Node properties are keyed by internal id; relationship properties by the
//! edge ordinal within a source's adjacency list. Values are 64-bit wide
//! throughout: doubles travel as their bit patterns and are reinterpreted
//! through the schema's value type.

pub mod node_property_store;
pub mod relationship_property_store;

pub use node_property_store::{NodeProperty, NodePropertyStore, NodePropertyValues};
pub use relationship_property_store::{
    ConstantRelationshipProperties, CursorRelationshipProperties, EmptyRelationshipProperties,
    RelationshipProperties, RelationshipProperty, RelationshipPropertyStore,
};

use crate::types::schema::ValueType;

/// A single typed property value in flight during load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Long(i64),
    Double(f64),
}

impl PropertyValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            PropertyValue::Long(_) => ValueType::Long,
            PropertyValue::Double(_) => ValueType::Double,
        }
    }

    /// The value as raw 64 bits, the layout property columns store.
    pub fn to_bits(&self) -> i64 {
        match self {
            PropertyValue::Long(v) => *v,
            PropertyValue::Double(v) => v.to_bits() as i64,
        }
    }

    /// Reinterprets raw column bits according to a value type.
    pub fn from_bits(bits: i64, value_type: ValueType) -> PropertyValue {
        match value_type {
            ValueType::Double => PropertyValue::Double(f64::from_bits(bits as u64)),
            _ => PropertyValue::Long(bits),
        }
    }

    pub fn double_value(&self) -> f64 {
        match self {
            PropertyValue::Long(v) => *v as f64,
            PropertyValue::Double(v) => *v,
        }
    }

    pub fn long_value(&self) -> i64 {
        match self {
            PropertyValue::Long(v) => *v,
            PropertyValue::Double(v) => *v as i64,
        }
    }
}
