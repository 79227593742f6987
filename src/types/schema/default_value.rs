use crate::types::schema::ValueType;
use serde::{Deserialize, Serialize};

/// Default value for a property when no value is present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    Long(i64),
    Double(f64),
    String(String),
    Bool(bool),
}

impl DefaultValue {
    /// The canonical fallback for the given value type.
    pub fn of(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Long => DefaultValue::Long(0),
            ValueType::Double => DefaultValue::Double(0.0),
            ValueType::String => DefaultValue::String(String::new()),
            ValueType::Boolean => DefaultValue::Bool(false),
        }
    }

    pub fn long(value: i64) -> Self {
        DefaultValue::Long(value)
    }

    pub fn double(value: f64) -> Self {
        DefaultValue::Double(value)
    }

    /// Returns the long value, or 0 if this is not a long.
    pub fn long_value(&self) -> i64 {
        match self {
            DefaultValue::Long(v) => *v,
            _ => 0,
        }
    }

    /// Returns the double value, converting a long default if necessary.
    pub fn double_value(&self) -> f64 {
        match self {
            DefaultValue::Double(v) => *v,
            DefaultValue::Long(v) => *v as f64,
            _ => 0.0,
        }
    }

    /// The value type this default belongs to.
    pub fn value_type(&self) -> ValueType {
        match self {
            DefaultValue::Long(_) => ValueType::Long,
            DefaultValue::Double(_) => ValueType::Double,
            DefaultValue::String(_) => ValueType::String,
            DefaultValue::Bool(_) => ValueType::Boolean,
        }
    }
}

impl std::fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultValue::Long(v) => write!(f, "{}", v),
            DefaultValue::Double(v) => write!(f, "{}", v),
            DefaultValue::String(v) => write!(f, "\"{}\"", v),
            DefaultValue::Bool(v) => write!(f, "{}", v),
        }
    }
}
