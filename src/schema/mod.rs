//! Core map data structures and structural validation

mod edge;
mod map;
mod node;
mod validate;

pub use edge::EcosystemEdge;
pub use map::{EcosystemMap, MapCandidate, MapPatch, DEFAULT_SECTION};
pub use node::{EcosystemNode, NodeType, Position, CANVAS_EXTENT};
pub use validate::{check_references, validate, ValidationError};
