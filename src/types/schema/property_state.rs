use serde::{Deserialize, Serialize};

/// Provenance of a property: where its values live across projections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyState {
    /// Survives projection boundaries.
    Persistent,
    /// In-memory only.
    Transient,
    /// Resolved from a remote source.
    Remote,
}

impl std::fmt::Display for PropertyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyState::Persistent => write!(f, "PERSISTENT"),
            PropertyState::Transient => write!(f, "TRANSIENT"),
            PropertyState::Remote => write!(f, "REMOTE"),
        }
    }
}
