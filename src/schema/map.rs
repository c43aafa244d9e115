//! Ecosystem map entity, extraction candidate, and merge-patch carrier

use super::edge::EcosystemEdge;
use super::node::EcosystemNode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification tag applied to every map. Currently a constant; reserved
/// for future multi-tenancy.
pub const DEFAULT_SECTION: &str = "regulatory";

/// One ecosystem graph with identity and timestamps.
///
/// A blank `id` means the map has not been persisted yet; the store assigns
/// an identifier at save time. Timestamps are stamped server-side on every
/// accepted write — `updated_at` strictly increases per map id, `created_at`
/// is set on first insertion and never overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcosystemMap {
    pub id: String,
    /// Display title
    pub name: String,
    /// Classification tag, see [`DEFAULT_SECTION`]
    pub section: String,
    pub nodes: Vec<EcosystemNode>,
    pub edges: Vec<EcosystemEdge>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl EcosystemMap {
    /// Create an empty, unpersisted map with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            name: name.into(),
            section: DEFAULT_SECTION.to_string(),
            nodes: Vec::new(),
            edges: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// True when the map has not been assigned a persistent identifier.
    pub fn is_unsaved(&self) -> bool {
        self.id.trim().is_empty()
    }

    pub fn with_node(mut self, node: EcosystemNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_edge(mut self, edge: EcosystemEdge) -> Self {
        self.edges.push(edge);
        self
    }
}

/// An unpersisted map produced by extraction.
///
/// Carries no identifier or timestamps — those are assigned by the store at
/// the moment of persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapCandidate {
    pub name: String,
    pub nodes: Vec<EcosystemNode>,
    pub edges: Vec<EcosystemEdge>,
}

impl MapCandidate {
    /// Promote the candidate to an unpersisted [`EcosystemMap`]. The store
    /// assigns the id and rewrites both timestamps on save.
    pub fn into_map(self) -> EcosystemMap {
        let mut map = EcosystemMap::new(self.name);
        map.nodes = self.nodes;
        map.edges = self.edges;
        map
    }
}

/// Merge-patch carrier for partial updates.
///
/// Only the fields present are written; everything else is preserved from
/// the pre-update document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapPatch {
    pub name: Option<String>,
    pub section: Option<String>,
    pub nodes: Option<Vec<EcosystemNode>>,
    pub edges: Option<Vec<EcosystemEdge>>,
}

impl MapPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_nodes(mut self, nodes: Vec<EcosystemNode>) -> Self {
        self.nodes = Some(nodes);
        self
    }

    pub fn with_edges(mut self, edges: Vec<EcosystemEdge>) -> Self {
        self.edges = Some(edges);
        self
    }

    /// True when the patch touches nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.section.is_none()
            && self.nodes.is_none()
            && self.edges.is_none()
    }

    /// Apply the patch to a map, leaving untouched fields as they were.
    /// Timestamps are not the patch's concern; the store stamps them.
    pub fn apply_to(self, map: &mut EcosystemMap) {
        if let Some(name) = self.name {
            map.name = name;
        }
        if let Some(section) = self.section {
            map.section = section;
        }
        if let Some(nodes) = self.nodes {
            map.nodes = nodes;
        }
        if let Some(edges) = self.edges {
            map.edges = edges;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::NodeType;

    #[test]
    fn new_map_is_unsaved_with_default_section() {
        let map = EcosystemMap::new("Payments oversight");
        assert!(map.is_unsaved());
        assert_eq!(map.section, DEFAULT_SECTION);
        assert!(map.nodes.is_empty());
    }

    #[test]
    fn candidate_promotion_keeps_graph_content() {
        let candidate = MapCandidate {
            name: "T".to_string(),
            nodes: vec![EcosystemNode::new("n1", "CGA", NodeType::Authority)],
            edges: vec![],
        };
        let map = candidate.into_map();
        assert!(map.is_unsaved());
        assert_eq!(map.name, "T");
        assert_eq!(map.nodes.len(), 1);
        assert_eq!(map.nodes[0].label, "CGA");
    }

    #[test]
    fn patch_preserves_untouched_fields() {
        let mut map = EcosystemMap::new("before")
            .with_node(EcosystemNode::new("n1", "A", NodeType::Entity));
        let created = map.created_at;

        MapPatch::new().with_name("after").apply_to(&mut map);

        assert_eq!(map.name, "after");
        assert_eq!(map.nodes.len(), 1, "nodes untouched by a name patch");
        assert_eq!(map.created_at, created);
    }

    #[test]
    fn empty_patch_is_detectable() {
        assert!(MapPatch::new().is_empty());
        assert!(!MapPatch::new().with_name("x").is_empty());
    }

    #[test]
    fn map_serializes_timestamps_in_camel_case() {
        let map = EcosystemMap::new("T");
        let json = serde_json::to_value(&map).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
