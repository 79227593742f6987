use crate::types::schema::{DefaultValue, PropertyState, ValueType};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Aggregation strategy for relationship properties.
///
/// `Default` is a placeholder: it must be resolved to a concrete strategy
/// via [`Aggregation::resolve`] before storage is finalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aggregation {
    None,
    Single,
    Sum,
    Min,
    Max,
    Avg,
    Count,
    Default,
}

impl Aggregation {
    /// Resolves the `Default` placeholder to its concrete strategy.
    pub fn resolve(agg: Aggregation) -> Aggregation {
        match agg {
            Aggregation::Default => Aggregation::None,
            other => other,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Aggregation::Default)
    }
}

impl std::fmt::Display for Aggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Aggregation::None => "NONE",
            Aggregation::Single => "SINGLE",
            Aggregation::Sum => "SUM",
            Aggregation::Min => "MIN",
            Aggregation::Max => "MAX",
            Aggregation::Avg => "AVG",
            Aggregation::Count => "COUNT",
            Aggregation::Default => "DEFAULT",
        };
        write!(f, "{}", name)
    }
}

/// Common surface of node and relationship property schemas.
pub trait PropertySchemaTrait: Send + Sync {
    fn key(&self) -> &str;
    fn value_type(&self) -> ValueType;
    fn default_value(&self) -> &DefaultValue;
    fn state(&self) -> PropertyState;
}

/// Schema describing a node property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    key: String,
    value_type: ValueType,
    default_value: DefaultValue,
    state: PropertyState,
}

impl PropertySchema {
    pub fn new(
        key: impl Into<String>,
        value_type: ValueType,
        default_value: DefaultValue,
        state: PropertyState,
    ) -> Self {
        Self {
            key: key.into(),
            value_type,
            default_value,
            state,
        }
    }

    /// Creates a property schema with the canonical default value and
    /// persistent state.
    pub fn of(key: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(
            key,
            value_type,
            DefaultValue::of(value_type),
            PropertyState::Persistent,
        )
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn default_value(&self) -> &DefaultValue {
        &self.default_value
    }

    pub fn state(&self) -> PropertyState {
        self.state
    }

    /// Map-shaped dump of the schema fields.
    pub fn to_map(&self) -> serde_json::Value {
        json!({
            "valueType": self.value_type.name(),
            "defaultValue": self.default_value.to_string(),
            "state": self.state.to_string(),
        })
    }
}

impl PropertySchemaTrait for PropertySchema {
    fn key(&self) -> &str {
        &self.key
    }

    fn value_type(&self) -> ValueType {
        self.value_type
    }

    fn default_value(&self) -> &DefaultValue {
        &self.default_value
    }

    fn state(&self) -> PropertyState {
        self.state
    }
}

/// Schema describing a relationship property: a property schema plus the
/// aggregation applied when parallel relationships collapse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationshipPropertySchema {
    base: PropertySchema,
    aggregation: Aggregation,
}

impl RelationshipPropertySchema {
    pub fn new(base: PropertySchema, aggregation: Aggregation) -> Self {
        Self { base, aggregation }
    }

    /// Creates a relationship property schema with default settings.
    pub fn of(key: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            base: PropertySchema::of(key, value_type),
            aggregation: Aggregation::Default,
        }
    }

    pub fn with_aggregation(
        key: impl Into<String>,
        value_type: ValueType,
        default_value: DefaultValue,
        state: PropertyState,
        aggregation: Aggregation,
    ) -> Self {
        Self {
            base: PropertySchema::new(key, value_type, default_value, state),
            aggregation,
        }
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    /// Returns a copy where a `Default` aggregation is resolved.
    pub fn normalize(&self) -> Self {
        if self.aggregation.is_default() {
            Self {
                base: self.base.clone(),
                aggregation: Aggregation::resolve(self.aggregation),
            }
        } else {
            self.clone()
        }
    }

    /// Map-shaped dump of the schema fields, aggregation included.
    pub fn to_map(&self) -> serde_json::Value {
        json!({
            "valueType": self.base.value_type().name(),
            "defaultValue": self.base.default_value().to_string(),
            "state": self.base.state().to_string(),
            "aggregation": self.aggregation.to_string(),
        })
    }
}

impl PropertySchemaTrait for RelationshipPropertySchema {
    fn key(&self) -> &str {
        self.base.key()
    }

    fn value_type(&self) -> ValueType {
        self.base.value_type()
    }

    fn default_value(&self) -> &DefaultValue {
        self.base.default_value()
    }

    fn state(&self) -> PropertyState {
        self.base.state()
    }
}
