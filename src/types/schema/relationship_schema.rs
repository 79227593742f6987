use crate::types::schema::{
    Direction, PropertySchemaTrait, RelationshipPropertySchema, RelationshipType, SchemaError,
    SchemaResult, ValueType,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{HashMap, HashSet};

/// Schema entry for one relationship type: type, direction, property map.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelationshipSchemaEntry {
    identifier: RelationshipType,
    direction: Direction,
    properties: HashMap<String, RelationshipPropertySchema>,
}

impl RelationshipSchemaEntry {
    pub fn new(
        identifier: RelationshipType,
        direction: Direction,
        properties: HashMap<String, RelationshipPropertySchema>,
    ) -> Self {
        Self {
            identifier,
            direction,
            properties,
        }
    }

    pub fn empty(identifier: RelationshipType, direction: Direction) -> Self {
        Self::new(identifier, direction, HashMap::new())
    }

    pub fn identifier(&self) -> &RelationshipType {
        &self.identifier
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_undirected(&self) -> bool {
        self.direction.is_undirected()
    }

    pub fn properties(&self) -> &HashMap<String, RelationshipPropertySchema> {
        &self.properties
    }

    /// Merges two entries for the same type.
    ///
    /// Directions must agree; two declarations of the same type with
    /// different directions cannot coexist in one schema.
    pub fn union(&self, other: &RelationshipSchemaEntry) -> SchemaResult<RelationshipSchemaEntry> {
        if self.identifier != other.identifier {
            return Err(SchemaError::IdentifierMismatch {
                left: self.identifier.name().to_string(),
                right: other.identifier.name().to_string(),
            });
        }
        if self.direction != other.direction {
            return Err(SchemaError::DirectionalityConflict {
                relationship_type: self.identifier.name().to_string(),
            });
        }
        Ok(RelationshipSchemaEntry::new(
            self.identifier.clone(),
            self.direction,
            union_relationship_properties(&self.properties, &other.properties)?,
        ))
    }

    /// Returns a copy with every `Default` aggregation resolved.
    pub fn normalize(&self) -> RelationshipSchemaEntry {
        RelationshipSchemaEntry::new(
            self.identifier.clone(),
            self.direction,
            self.properties
                .iter()
                .map(|(key, schema)| (key.clone(), schema.normalize()))
                .collect(),
        )
    }

    /// Map-shaped dump: `{direction, properties: {key -> schema fields}}`.
    pub fn to_map(&self) -> serde_json::Value {
        let properties: serde_json::Map<String, serde_json::Value> = self
            .properties
            .iter()
            .map(|(key, schema)| (key.clone(), schema.to_map()))
            .collect();
        json!({
            "direction": self.direction.to_string(),
            "properties": properties,
        })
    }
}

/// Immutable schema for the relationships of a graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelationshipSchema {
    entries: HashMap<RelationshipType, RelationshipSchemaEntry>,
}

impl RelationshipSchema {
    pub fn new(entries: HashMap<RelationshipType, RelationshipSchemaEntry>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, rel_type: &RelationshipType) -> Option<&RelationshipSchemaEntry> {
        self.entries.get(rel_type)
    }

    pub fn entries(&self) -> impl Iterator<Item = &RelationshipSchemaEntry> {
        self.entries.values()
    }

    pub fn available_types(&self) -> HashSet<RelationshipType> {
        self.entries.keys().cloned().collect()
    }

    /// True when every relationship type in the schema is undirected.
    pub fn is_undirected(&self) -> bool {
        self.entries.values().all(|entry| entry.is_undirected())
    }

    /// Direction check for one type; unknown types are not undirected.
    pub fn is_undirected_for_type(&self, rel_type: &RelationshipType) -> bool {
        self.entries
            .get(rel_type)
            .map(|entry| entry.is_undirected())
            .unwrap_or(false)
    }

    /// New schema containing only the requested types.
    pub fn filter(&self, types_to_keep: &HashSet<RelationshipType>) -> RelationshipSchema {
        RelationshipSchema::new(
            self.entries
                .iter()
                .filter(|(rel_type, _)| types_to_keep.contains(rel_type))
                .map(|(rel_type, entry)| (rel_type.clone(), entry.clone()))
                .collect(),
        )
    }

    /// Merged schema; entries for the same type union per the entry rules.
    pub fn union(&self, other: &RelationshipSchema) -> SchemaResult<RelationshipSchema> {
        let mut result = self.entries.clone();
        for (rel_type, other_entry) in &other.entries {
            match result.get(rel_type) {
                Some(existing) => {
                    let merged = existing.union(other_entry)?;
                    result.insert(rel_type.clone(), merged);
                }
                None => {
                    result.insert(rel_type.clone(), other_entry.clone());
                }
            }
        }
        Ok(RelationshipSchema::new(result))
    }

    /// Returns a copy with every `Default` aggregation resolved.
    pub fn normalize(&self) -> RelationshipSchema {
        RelationshipSchema::new(
            self.entries
                .iter()
                .map(|(rel_type, entry)| (rel_type.clone(), entry.normalize()))
                .collect(),
        )
    }

    /// Union of property keys across all types.
    pub fn all_properties(&self) -> HashSet<String> {
        self.entries
            .values()
            .flat_map(|entry| entry.properties.keys().cloned())
            .collect()
    }

    /// Map-shaped dump keyed by type name.
    pub fn to_map(&self) -> serde_json::Value {
        let entries: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|(rel_type, entry)| (rel_type.name().to_string(), entry.to_map()))
            .collect();
        serde_json::Value::Object(entries)
    }
}

/// Mutable relationship schema used while a graph is being assembled.
#[derive(Clone, Debug, Default)]
pub struct MutableRelationshipSchema {
    entries: HashMap<RelationshipType, RelationshipSchemaEntry>,
}

impl MutableRelationshipSchema {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn from_schema(schema: &RelationshipSchema) -> Self {
        Self {
            entries: schema.entries.clone(),
        }
    }

    /// Gets or creates the entry for a relationship type.
    ///
    /// The direction of an existing entry wins; callers that need a
    /// direction change must rebuild the schema.
    pub fn get_or_create_type(
        &mut self,
        rel_type: RelationshipType,
        direction: Direction,
    ) -> &mut RelationshipSchemaEntry {
        self.entries
            .entry(rel_type.clone())
            .or_insert_with(|| RelationshipSchemaEntry::empty(rel_type, direction))
    }

    /// Adds a relationship type with an empty property map. Idempotent.
    pub fn add_relationship_type(
        &mut self,
        rel_type: RelationshipType,
        direction: Direction,
    ) -> &mut Self {
        self.get_or_create_type(rel_type, direction);
        self
    }

    /// Adds or overwrites a property on a relationship type.
    pub fn add_property(
        &mut self,
        rel_type: RelationshipType,
        direction: Direction,
        key: impl Into<String>,
        schema: RelationshipPropertySchema,
    ) -> &mut Self {
        let entry = self.get_or_create_type(rel_type, direction);
        entry.properties.insert(key.into(), schema);
        self
    }

    /// Shorthand taking only a value type.
    pub fn add_property_of(
        &mut self,
        rel_type: RelationshipType,
        direction: Direction,
        key: impl Into<String>,
        value_type: ValueType,
    ) -> &mut Self {
        let key = key.into();
        self.add_property(
            rel_type,
            direction,
            key.clone(),
            RelationshipPropertySchema::of(key, value_type),
        )
    }

    /// Removes a property from a type. No-op if either is absent.
    pub fn remove_property(&mut self, rel_type: &RelationshipType, key: &str) {
        if let Some(entry) = self.entries.get_mut(rel_type) {
            entry.properties.remove(key);
        }
    }

    pub fn available_types(&self) -> HashSet<RelationshipType> {
        self.entries.keys().cloned().collect()
    }

    /// Freezes into an immutable schema.
    pub fn build(self) -> RelationshipSchema {
        RelationshipSchema::new(self.entries)
    }
}

/// Unions two relationship property maps, failing on conflicting value types.
fn union_relationship_properties(
    left: &HashMap<String, RelationshipPropertySchema>,
    right: &HashMap<String, RelationshipPropertySchema>,
) -> SchemaResult<HashMap<String, RelationshipPropertySchema>> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::schema::Aggregation;

    fn rel(name: &str) -> RelationshipType {
        RelationshipType::of(name)
    }

    #[test]
    fn test_entry_properties() {
        let mut schema = MutableRelationshipSchema::empty();
        schema.add_property_of(rel("KNOWS"), Direction::Directed, "since", ValueType::Long);
        schema.add_property_of(
            rel("KNOWS"),
            Direction::Directed,
            "weight",
            ValueType::Double,
        );
        let built = schema.build();
        assert_eq!(built.get(&rel("KNOWS")).unwrap().properties().len(), 2);
    }

    #[test]
    fn test_union_merges_property_maps() {
        let mut left = MutableRelationshipSchema::empty();
        left.add_property_of(rel("KNOWS"), Direction::Directed, "since", ValueType::Long);
        let mut right = MutableRelationshipSchema::empty();
        right.add_property_of(
            rel("KNOWS"),
            Direction::Directed,
            "weight",
            ValueType::Double,
        );

        let union = left.build().union(&right.build()).unwrap();
        assert_eq!(union.get(&rel("KNOWS")).unwrap().properties().len(), 2);
    }

    #[test]
    fn test_union_direction_conflict() {
        let mut left = MutableRelationshipSchema::empty();
        left.add_relationship_type(rel("KNOWS"), Direction::Directed);
        let mut right = MutableRelationshipSchema::empty();
        right.add_relationship_type(rel("KNOWS"), Direction::Undirected);

        let err = left.build().union(&right.build()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DirectionalityConflict { relationship_type } if relationship_type == "KNOWS"
        ));
    }

    #[test]
    fn test_union_property_type_conflict() {
        let mut left = MutableRelationshipSchema::empty();
        left.add_property_of(rel("R"), Direction::Directed, "v", ValueType::Long);
        let mut right = MutableRelationshipSchema::empty();
        right.add_property_of(rel("R"), Direction::Directed, "v", ValueType::Double);

        let err = left.build().union(&right.build()).unwrap_err();
        assert!(matches!(err, SchemaError::PropertyTypeConflict { .. }));
    }

    #[test]
    fn test_is_undirected() {
        let mut schema = MutableRelationshipSchema::empty();
        schema.add_relationship_type(rel("R1"), Direction::Undirected);
        schema.add_relationship_type(rel("R2"), Direction::Undirected);
        let built = schema.build();
        assert!(built.is_undirected());
        assert!(built.is_undirected_for_type(&rel("R1")));
        assert!(!built.is_undirected_for_type(&rel("MISSING")));

        let mut mixed = MutableRelationshipSchema::empty();
        mixed.add_relationship_type(rel("R1"), Direction::Undirected);
        mixed.add_relationship_type(rel("R2"), Direction::Directed);
        assert!(!mixed.build().is_undirected());
    }

    #[test]
    fn test_normalize_resolves_default_aggregation() {
        let mut schema = MutableRelationshipSchema::empty();
        schema.add_property_of(rel("R"), Direction::Directed, "w", ValueType::Double);
        let built = schema.build();
        assert_eq!(
            built.get(&rel("R")).unwrap().properties()["w"].aggregation(),
            Aggregation::Default
        );

        let normalized = built.normalize();
        assert_eq!(
            normalized.get(&rel("R")).unwrap().properties()["w"].aggregation(),
            Aggregation::None
        );
    }

    #[test]
    fn test_filter() {
        let mut schema = MutableRelationshipSchema::empty();
        schema.add_relationship_type(rel("A"), Direction::Directed);
        schema.add_relationship_type(rel("B"), Direction::Undirected);
        let built = schema.build();

        let keep: HashSet<_> = [rel("B")].into_iter().collect();
        let filtered = built.filter(&keep);
        assert_eq!(filtered.available_types(), keep);
    }

    #[test]
    fn test_to_map_shape() {
        let mut schema = MutableRelationshipSchema::empty();
        schema.add_property_of(rel("KNOWS"), Direction::Undirected, "since", ValueType::Long);
        let map = schema.build().to_map();
        assert_eq!(map["KNOWS"]["direction"], "UNDIRECTED");
        assert_eq!(map["KNOWS"]["properties"]["since"]["valueType"], "LONG");
    }
}
