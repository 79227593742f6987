// Schema registry: the typed shape of a graph.
//
// Node labels, relationship types with directionality, and the property
// schemas hanging off both. Schemas are assembled through the mutable
// builders during load and frozen into the immutable forms on finalize.

pub mod default_value;
pub mod direction;
pub mod element_identifier;
pub mod graph_schema;
pub mod node_schema;
pub mod property_schema;
pub mod property_state;
pub mod relationship_schema;
pub mod value_type;

pub use default_value::DefaultValue;
pub use direction::Direction;
pub use element_identifier::{ElementIdentifier, NodeLabel, RelationshipType};
pub use graph_schema::{GraphSchema, MutableGraphSchema};
pub use node_schema::{MutableNodeSchema, NodeSchema, NodeSchemaEntry};
pub use property_schema::{
    Aggregation, PropertySchema, PropertySchemaTrait, RelationshipPropertySchema,
};
pub use property_state::PropertyState;
pub use relationship_schema::{
    MutableRelationshipSchema, RelationshipSchema, RelationshipSchemaEntry,
};
pub use value_type::ValueType;

/// Error type for schema operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    #[error("Property '{key}' has conflicting value types: {left:?} vs {right:?}")]
    PropertyTypeConflict {
        key: String,
        left: ValueType,
        right: ValueType,
    },

    #[error("Conflicting directionality for relationship type: {relationship_type}")]
    DirectionalityConflict { relationship_type: String },

    #[error("Cannot union entries with different identifiers: {left} and {right}")]
    IdentifierMismatch { left: String, right: String },
}

pub type SchemaResult<T> = Result<T, SchemaError>;
