//! Directed relationship between two actors in the same map

use serde::{Deserialize, Serialize};

/// A directed, optionally labeled relationship between two nodes.
///
/// `source` and `target` must reference node ids within the same map; a
/// dangling endpoint fails validation before the map reaches persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcosystemEdge {
    /// Identifier, unique within its map
    pub id: String,
    /// Node id the edge originates from
    pub source: String,
    /// Node id the edge points to
    pub target: String,
    /// Optional description of the relationship
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl EcosystemEdge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
