use serde::{Deserialize, Serialize};

/// Directionality of a relationship type.
///
/// Undirected relationships are materialized on both endpoints' adjacency
/// lists; the schema records the intent so that unions can reject
/// contradictory declarations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Directed,
    Undirected,
}

impl Direction {
    pub fn is_undirected(&self) -> bool {
        matches!(self, Direction::Undirected)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Directed => write!(f, "DIRECTED"),
            Direction::Undirected => write!(f, "UNDIRECTED"),
        }
    }
}
