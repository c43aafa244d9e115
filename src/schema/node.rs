//! Node representation in an ecosystem map

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Extent of the normalized layout canvas. Extraction estimates node
/// coordinates within `0..=CANVAS_EXTENT` on both axes.
pub const CANVAS_EXTENT: f64 = 800.0;

/// Classification of an actor in the regulatory ecosystem.
///
/// The enumeration is closed: payloads carrying any other value fail
/// validation rather than being coerced to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Regulator or supervisory authority
    Authority,
    /// Supervised or market entity
    Entity,
    /// Court or tribunal
    Judicial,
    /// Service provider
    Service,
    /// Anything that fits none of the above
    Other,
}

impl NodeType {
    /// All valid wire values, in declaration order.
    pub const ALL: [NodeType; 5] = [
        NodeType::Authority,
        NodeType::Entity,
        NodeType::Judicial,
        NodeType::Service,
        NodeType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Authority => "authority",
            NodeType::Entity => "entity",
            NodeType::Judicial => "judicial",
            NodeType::Service => "service",
            NodeType::Other => "other",
        }
    }
}

impl FromStr for NodeType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "authority" => Ok(NodeType::Authority),
            "entity" => Ok(NodeType::Entity),
            "judicial" => Ok(NodeType::Judicial),
            "service" => Ok(NodeType::Service),
            "other" => Ok(NodeType::Other),
            _ => Err(()),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approximate layout position on the normalized canvas.
///
/// Used only for rendering, never for semantics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An actor in the regulatory ecosystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcosystemNode {
    /// Identifier, unique within its map
    pub id: String,
    /// Literal text transcribed from the source diagram
    pub label: String,
    /// Actor classification
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Optional symbolic icon name, purely presentational
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Layout position on the normalized canvas
    pub position: Position,
}

impl EcosystemNode {
    /// Create a node with the given id, label, and type at the canvas origin.
    pub fn new(id: impl Into<String>, label: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type,
            icon: None,
            position: Position::default(),
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}
