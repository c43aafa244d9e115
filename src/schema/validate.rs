//! Structural validation of candidate map payloads
//!
//! `validate()` is pure and self-contained: referential integrity is checked
//! against the payload's own node set, never against persisted state. A
//! candidate must pass here before it is allowed to cross into the store.

use super::edge::EcosystemEdge;
use super::map::MapCandidate;
use super::node::{EcosystemNode, NodeType, Position};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// A structural violation detected before persistence.
///
/// Every variant names the offending field, node, or edge so the caller can
/// surface it without re-walking the payload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("node `{node}` has unknown type `{value}`")]
    UnknownNodeType { node: String, value: String },

    #[error("duplicate node id `{0}`")]
    DuplicateNodeId(String),

    #[error("duplicate edge id `{0}`")]
    DuplicateEdgeId(String),

    #[error("edge `{edge}` references missing node `{endpoint}`")]
    DanglingEdge { edge: String, endpoint: String },
}

/// Validate an arbitrary structured payload into a [`MapCandidate`].
///
/// Enforces field presence and types, the closed node-type enumeration
/// (unknown values fail, no coercion to `other`), per-payload id uniqueness,
/// and edge referential integrity. No side effects, no field coercion beyond
/// type normalization.
pub fn validate(payload: &Value) -> Result<MapCandidate, ValidationError> {
    let obj = payload.as_object().ok_or(ValidationError::NotAnObject)?;

    let name = require_str(obj.get("name"), "name")?.to_string();

    let raw_nodes = require_array(obj.get("nodes"), "nodes")?;
    let mut nodes = Vec::with_capacity(raw_nodes.len());
    for raw in raw_nodes {
        nodes.push(parse_node(raw)?);
    }

    let raw_edges = require_array(obj.get("edges"), "edges")?;
    let mut edges = Vec::with_capacity(raw_edges.len());
    for raw in raw_edges {
        edges.push(parse_edge(raw)?);
    }

    check_references(&nodes, &edges)?;

    Ok(MapCandidate { name, nodes, edges })
}

/// Shared integrity pass: per-map id uniqueness and edge endpoint
/// resolution. The store re-runs this before every persist, including the
/// merged result of a partial update.
pub fn check_references(
    nodes: &[EcosystemNode],
    edges: &[EcosystemEdge],
) -> Result<(), ValidationError> {
    let mut node_ids = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !node_ids.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateNodeId(node.id.clone()));
        }
    }

    let mut edge_ids = HashSet::with_capacity(edges.len());
    for edge in edges {
        if !edge_ids.insert(edge.id.as_str()) {
            return Err(ValidationError::DuplicateEdgeId(edge.id.clone()));
        }
        for endpoint in [&edge.source, &edge.target] {
            if !node_ids.contains(endpoint.as_str()) {
                return Err(ValidationError::DanglingEdge {
                    edge: edge.id.clone(),
                    endpoint: endpoint.clone(),
                });
            }
        }
    }

    Ok(())
}

fn parse_node(raw: &Value) -> Result<EcosystemNode, ValidationError> {
    let obj = raw.as_object().ok_or(ValidationError::WrongType {
        field: "nodes[]".to_string(),
        expected: "an object",
    })?;

    let id = require_str(obj.get("id"), "nodes[].id")?.to_string();
    let label = require_str(obj.get("label"), "nodes[].label")?.to_string();

    let type_str = require_str(obj.get("type"), "nodes[].type")?;
    let node_type: NodeType =
        type_str
            .parse()
            .map_err(|()| ValidationError::UnknownNodeType {
                node: id.clone(),
                value: type_str.to_string(),
            })?;

    let icon = match obj.get("icon") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            return Err(ValidationError::WrongType {
                field: format!("nodes[{}].icon", id),
                expected: "a string",
            })
        }
    };

    let position = parse_position(obj.get("position"), &id)?;

    Ok(EcosystemNode {
        id,
        label,
        node_type,
        icon,
        position,
    })
}

fn parse_position(raw: Option<&Value>, node_id: &str) -> Result<Position, ValidationError> {
    let obj = raw
        .ok_or(ValidationError::MissingField("nodes[].position"))?
        .as_object()
        .ok_or_else(|| ValidationError::WrongType {
            field: format!("nodes[{}].position", node_id),
            expected: "an object",
        })?;

    let coord = |axis: &'static str| -> Result<f64, ValidationError> {
        obj.get(axis)
            .and_then(Value::as_f64)
            .ok_or_else(|| ValidationError::WrongType {
                field: format!("nodes[{}].position.{}", node_id, axis),
                expected: "a number",
            })
    };

    Ok(Position {
        x: coord("x")?,
        y: coord("y")?,
    })
}

fn parse_edge(raw: &Value) -> Result<EcosystemEdge, ValidationError> {
    let obj = raw.as_object().ok_or(ValidationError::WrongType {
        field: "edges[]".to_string(),
        expected: "an object",
    })?;

    let id = require_str(obj.get("id"), "edges[].id")?.to_string();
    let source = require_str(obj.get("source"), "edges[].source")?.to_string();
    let target = require_str(obj.get("target"), "edges[].target")?.to_string();

    let label = match obj.get("label") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            return Err(ValidationError::WrongType {
                field: format!("edges[{}].label", id),
                expected: "a string",
            })
        }
    };

    Ok(EcosystemEdge {
        id,
        source,
        target,
        label,
    })
}

fn require_str<'a>(
    value: Option<&'a Value>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ValidationError::WrongType {
            field: field.to_string(),
            expected: "a string",
        }),
    }
}

fn require_array<'a>(
    value: Option<&'a Value>,
    field: &'static str,
) -> Result<&'a [Value], ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(ValidationError::WrongType {
            field: field.to_string(),
            expected: "an array",
        }),
    }
}
