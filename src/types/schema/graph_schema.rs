use crate::types::schema::{
    MutableNodeSchema, MutableRelationshipSchema, NodeLabel, NodeSchema, PropertySchema,
    RelationshipSchema, RelationshipType, SchemaError, SchemaResult,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{HashMap, HashSet};

/// The typed shape of a whole graph: node schema, relationship schema, and
/// graph-level properties.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphSchema {
    node_schema: NodeSchema,
    relationship_schema: RelationshipSchema,
    graph_properties: HashMap<String, PropertySchema>,
}

impl GraphSchema {
    pub fn new(
        node_schema: NodeSchema,
        relationship_schema: RelationshipSchema,
        graph_properties: HashMap<String, PropertySchema>,
    ) -> Self {
        Self {
            node_schema,
            relationship_schema,
            graph_properties,
        }
    }

    pub fn empty() -> Self {
        Self {
            node_schema: NodeSchema::empty(),
            relationship_schema: RelationshipSchema::empty(),
            graph_properties: HashMap::new(),
        }
    }

    pub fn node_schema(&self) -> &NodeSchema {
        &self.node_schema
    }

    pub fn relationship_schema(&self) -> &RelationshipSchema {
        &self.relationship_schema
    }

    pub fn graph_properties(&self) -> &HashMap<String, PropertySchema> {
        &self.graph_properties
    }

    /// New schema containing only the requested labels; relationship and
    /// graph-level parts are carried over unchanged.
    pub fn filter_node_labels(&self, labels: &HashSet<NodeLabel>) -> GraphSchema {
        GraphSchema::new(
            self.node_schema.filter(labels),
            self.relationship_schema.clone(),
            self.graph_properties.clone(),
        )
    }

    /// New schema containing only the requested relationship types.
    pub fn filter_relationship_types(&self, types: &HashSet<RelationshipType>) -> GraphSchema {
        GraphSchema::new(
            self.node_schema.clone(),
            self.relationship_schema.filter(types),
            self.graph_properties.clone(),
        )
    }

    /// Merges two graph schemas field by field.
    ///
    /// Graph-level properties follow the node property rules: the left-hand
    /// schema wins on matching value types, differing value types are a hard
    /// error.
    pub fn union(&self, other: &GraphSchema) -> SchemaResult<GraphSchema> {
        let node_schema = self.node_schema.union(&other.node_schema)?;
        let relationship_schema = self.relationship_schema.union(&other.relationship_schema)?;

        let mut graph_properties = self.graph_properties.clone();
        for (key, right_schema) in &other.graph_properties {
            if let Some(left_schema) = graph_properties.get(key) {
                if left_schema.value_type() != right_schema.value_type() {
                    return Err(SchemaError::PropertyTypeConflict {
                        key: key.clone(),
                        left: left_schema.value_type(),
                        right: right_schema.value_type(),
                    });
                }
            } else {
                graph_properties.insert(key.clone(), right_schema.clone());
            }
        }

        Ok(GraphSchema::new(
            node_schema,
            relationship_schema,
            graph_properties,
        ))
    }

    /// True when every relationship type in the schema is undirected.
    pub fn is_undirected(&self) -> bool {
        self.relationship_schema.is_undirected()
    }

    /// Direction check for one relationship type.
    pub fn is_undirected_for_type(&self, rel_type: &RelationshipType) -> bool {
        self.relationship_schema.is_undirected_for_type(rel_type)
    }

    /// Returns a copy with every `Default` aggregation resolved.
    pub fn normalize(&self) -> GraphSchema {
        GraphSchema::new(
            self.node_schema.clone(),
            self.relationship_schema.normalize(),
            self.graph_properties.clone(),
        )
    }

    /// Union of property keys across node entries, relationship entries, and
    /// graph-level properties.
    pub fn all_properties(&self) -> HashSet<String> {
        let mut keys = self.node_schema.all_properties();
        keys.extend(self.relationship_schema.all_properties());
        keys.extend(self.graph_properties.keys().cloned());
        keys
    }

    /// Map-shaped dump of all three schema fields.
    pub fn to_map(&self) -> serde_json::Value {
        let graph_properties: serde_json::Map<String, serde_json::Value> = self
            .graph_properties
            .iter()
            .map(|(key, schema)| (key.clone(), schema.to_map()))
            .collect();
        json!({
            "nodes": self.node_schema.to_map(),
            "relationships": self.relationship_schema.to_map(),
            "graphProperties": graph_properties,
        })
    }
}

/// Mutable graph schema used while a graph is being assembled.
#[derive(Clone, Debug, Default)]
pub struct MutableGraphSchema {
    node_schema: MutableNodeSchema,
    relationship_schema: MutableRelationshipSchema,
    graph_properties: HashMap<String, PropertySchema>,
}

impl MutableGraphSchema {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn node_schema_mut(&mut self) -> &mut MutableNodeSchema {
        &mut self.node_schema
    }

    pub fn relationship_schema_mut(&mut self) -> &mut MutableRelationshipSchema {
        &mut self.relationship_schema
    }

    /// Adds or overwrites a graph-level property.
    pub fn put_graph_property(
        &mut self,
        key: impl Into<String>,
        schema: PropertySchema,
    ) -> &mut Self {
        self.graph_properties.insert(key.into(), schema);
        self
    }

    /// Freezes into an immutable schema.
    pub fn build(self) -> GraphSchema {
        GraphSchema::new(
            self.node_schema.build(),
            self.relationship_schema.build(),
            self.graph_properties,
        )
    }
}
