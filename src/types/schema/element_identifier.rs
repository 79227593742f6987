use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Trait for element identifiers (node labels, relationship types).
///
/// Identifiers compare by name, never by identity.
pub trait ElementIdentifier: Clone + Eq + std::hash::Hash + Send + Sync {
    fn name(&self) -> &str;
}

/// Node label identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeLabel(String);

static ALL_NODES: Lazy<NodeLabel> = Lazy::new(|| NodeLabel("__ALL__".to_string()));

impl NodeLabel {
    pub fn of(name: impl Into<String>) -> Self {
        NodeLabel(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// The universal label: every node carries it.
    pub fn all_nodes() -> Self {
        ALL_NODES.clone()
    }

    pub fn is_all_nodes(&self) -> bool {
        self == &*ALL_NODES
    }
}

impl ElementIdentifier for NodeLabel {
    fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Relationship type identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationshipType(String);

impl RelationshipType {
    pub fn of(name: impl Into<String>) -> Self {
        RelationshipType(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl ElementIdentifier for RelationshipType {
    fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
