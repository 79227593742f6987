use serde::{Deserialize, Serialize};

/// Type of a property value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Long,
    Double,
    String,
    Boolean,
}

impl ValueType {
    /// The canonical fallback for this type, used when no default was
    /// declared.
    pub fn fallback_value(&self) -> crate::types::schema::DefaultValue {
        crate::types::schema::DefaultValue::of(*self)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Long => "LONG",
            ValueType::Double => "DOUBLE",
            ValueType::String => "STRING",
            ValueType::Boolean => "BOOLEAN",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
