use crate::types::schema::{
    NodeLabel, PropertySchema, SchemaError, SchemaResult, ValueType,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{HashMap, HashSet};

/// Schema entry for one node label: the label plus its property map.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeSchemaEntry {
    identifier: NodeLabel,
    properties: HashMap<String, PropertySchema>,
}

impl NodeSchemaEntry {
    pub fn new(identifier: NodeLabel, properties: HashMap<String, PropertySchema>) -> Self {
        Self {
            identifier,
            properties,
        }
    }

    pub fn empty(identifier: NodeLabel) -> Self {
        Self::new(identifier, HashMap::new())
    }

    pub fn identifier(&self) -> &NodeLabel {
        &self.identifier
    }

    pub fn properties(&self) -> &HashMap<String, PropertySchema> {
        &self.properties
    }

    /// Merges the property maps of two entries for the same label.
    ///
    /// A key present on both sides must agree on value type; the left-hand
    /// schema wins when it does.
    pub fn union(&self, other: &NodeSchemaEntry) -> SchemaResult<NodeSchemaEntry> {
        if self.identifier != other.identifier {
            return Err(SchemaError::IdentifierMismatch {
                left: self.identifier.name().to_string(),
                right: other.identifier.name().to_string(),
            });
        }
        Ok(NodeSchemaEntry::new(
            self.identifier.clone(),
            union_node_properties(&self.properties, &other.properties)?,
        ))
    }

    /// Map-shaped dump: `{properties: {key -> schema fields}}`.
    pub fn to_map(&self) -> serde_json::Value {
        let properties: serde_json::Map<String, serde_json::Value> = self
            .properties
            .iter()
            .map(|(key, schema)| (key.clone(), schema.to_map()))
            .collect();
        json!({ "properties": properties })
    }
}

/// Immutable schema for the nodes of a graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeSchema {
    entries: HashMap<NodeLabel, NodeSchemaEntry>,
}

impl NodeSchema {
    pub fn new(entries: HashMap<NodeLabel, NodeSchemaEntry>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, label: &NodeLabel) -> Option<&NodeSchemaEntry> {
        self.entries.get(label)
    }

    pub fn entries(&self) -> impl Iterator<Item = &NodeSchemaEntry> {
        self.entries.values()
    }

    pub fn available_labels(&self) -> HashSet<NodeLabel> {
        self.entries.keys().cloned().collect()
    }

    /// New schema containing only the requested labels.
    pub fn filter(&self, labels_to_keep: &HashSet<NodeLabel>) -> NodeSchema {
        NodeSchema::new(
            self.entries
                .iter()
                .filter(|(label, _)| labels_to_keep.contains(label))
                .map(|(label, entry)| (label.clone(), entry.clone()))
                .collect(),
        )
    }

    /// Merged schema: entries union per label, property maps union per key.
    pub fn union(&self, other: &NodeSchema) -> SchemaResult<NodeSchema> {
        let mut result = self.entries.clone();
        for (label, other_entry) in &other.entries {
            match result.get(label) {
                Some(existing) => {
                    let merged = existing.union(other_entry)?;
                    result.insert(label.clone(), merged);
                }
                None => {
                    result.insert(label.clone(), other_entry.clone());
                }
            }
        }
        Ok(NodeSchema::new(result))
    }

    /// Union of property keys across all labels.
    pub fn all_properties(&self) -> HashSet<String> {
        self.entries
            .values()
            .flat_map(|entry| entry.properties.keys().cloned())
            .collect()
    }

    /// Property keys of one label, or `None` for an unknown label.
    pub fn all_properties_for(&self, label: &NodeLabel) -> Option<HashSet<String>> {
        self.entries
            .get(label)
            .map(|entry| entry.properties.keys().cloned().collect())
    }

    /// Map-shaped dump keyed by label name.
    pub fn to_map(&self) -> serde_json::Value {
        let entries: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|(label, entry)| (label.name().to_string(), entry.to_map()))
            .collect();
        serde_json::Value::Object(entries)
    }
}

/// Mutable node schema used while a graph is being assembled.
#[derive(Clone, Debug, Default)]
pub struct MutableNodeSchema {
    entries: HashMap<NodeLabel, NodeSchemaEntry>,
}

impl MutableNodeSchema {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn from_schema(schema: &NodeSchema) -> Self {
        Self {
            entries: schema
                .entries
                .iter()
                .map(|(label, entry)| (label.clone(), entry.clone()))
                .collect(),
        }
    }

    /// Adds a label with an empty property map. Idempotent.
    pub fn add_label(&mut self, label: NodeLabel) -> &mut Self {
        self.entries
            .entry(label.clone())
            .or_insert_with(|| NodeSchemaEntry::empty(label));
        self
    }

    /// Adds or overwrites a property on a label, creating the label entry if
    /// needed.
    pub fn add_property(
        &mut self,
        label: NodeLabel,
        key: impl Into<String>,
        schema: PropertySchema,
    ) -> &mut Self {
        let entry = self
            .entries
            .entry(label.clone())
            .or_insert_with(|| NodeSchemaEntry::empty(label));
        entry.properties.insert(key.into(), schema);
        self
    }

    /// Shorthand taking only a value type.
    pub fn add_property_of(
        &mut self,
        label: NodeLabel,
        key: impl Into<String>,
        value_type: ValueType,
    ) -> &mut Self {
        let key = key.into();
        self.add_property(label, key.clone(), PropertySchema::of(key, value_type))
    }

    /// Removes a property from a label. No-op if either is absent.
    pub fn remove_property(&mut self, label: &NodeLabel, key: &str) {
        if let Some(entry) = self.entries.get_mut(label) {
            entry.properties.remove(key);
        }
    }

    pub fn available_labels(&self) -> HashSet<NodeLabel> {
        self.entries.keys().cloned().collect()
    }

    /// Freezes into an immutable schema.
    pub fn build(self) -> NodeSchema {
        NodeSchema::new(self.entries)
    }
}

/// Unions two node property maps, failing on a key whose value types differ.
fn union_node_properties(
    left: &HashMap<String, PropertySchema>,
    right: &HashMap<String, PropertySchema>,
) -> SchemaResult<HashMap<String, PropertySchema>> {
    let mut result = left.clone();
    for (key, right_schema) in right {
        if let Some(left_schema) = result.get(key) {
            if left_schema.value_type() != right_schema.value_type() {
                return Err(SchemaError::PropertyTypeConflict {
                    key: key.clone(),
                    left: left_schema.value_type(),
                    right: right_schema.value_type(),
                });
            }
            // left wins on matching types
        } else {
            result.insert(key.clone(), right_schema.clone());
        }
    }
    Ok(result)
}
