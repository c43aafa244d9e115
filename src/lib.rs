//! Ecomap: Ecosystem Map Engine
//!
//! Converts uploaded diagram images into directed graphs of regulatory
//! actors and relationships via a vision-capable language model, persists
//! each graph as a mutable document, and keeps client sessions synchronized
//! with the shared collection under concurrent edits.
//!
//! # Core Concepts
//!
//! - **Maps**: one ecosystem graph (nodes + edges) with identity and timestamps
//! - **Candidates**: unpersisted maps produced by extraction, validated before save
//! - **Snapshots**: the full ordered collection, delivered on every change
//!
//! # Example
//!
//! ```
//! use ecomap::MapSession;
//!
//! let mut session = MapSession::new();
//! session.apply_snapshot(Vec::new());
//! assert!(session.is_empty());
//! ```

pub mod api;
pub mod config;
pub mod extract;
pub mod schema;
pub mod session;
pub mod store;

pub use api::EcosystemService;
pub use config::{ConfigError, VisionConfig};
pub use extract::{
    ExtractError, HttpVisionClient, ImageData, MockVisionClient, VisionClient, VisionError,
    VisionExtractor,
};
pub use schema::{
    check_references, validate, EcosystemEdge, EcosystemMap, EcosystemNode, MapCandidate,
    MapPatch, NodeType, Position, ValidationError, DEFAULT_SECTION,
};
pub use session::MapSession;
pub use store::{
    DocumentStore, MapStoreClient, OpenStore, Snapshot, SqliteStore, StoreError, StoreResult,
    Subscription,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
