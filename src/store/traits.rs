//! Document store trait definitions

use crate::schema::{EcosystemMap, ValidationError};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("map not found: {0}")]
    NotFound(String),

    #[error("invalid map: {0}")]
    Invalid(#[from] ValidationError),

    #[error("timestamp parsing error: {0}")]
    TimestampParse(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Backend over the `ecosystems` collection, one document per map keyed by
/// map id.
///
/// Implementations must be thread-safe (Send + Sync); the async client
/// layer shares one backend across sessions.
pub trait DocumentStore: Send + Sync {
    /// Insert or replace a document.
    fn put(&self, map: &EcosystemMap) -> StoreResult<()>;

    /// Load a document by map id.
    fn get(&self, id: &str) -> StoreResult<Option<EcosystemMap>>;

    /// Remove a document. Returns whether a document was actually removed.
    fn remove(&self, id: &str) -> StoreResult<bool>;

    /// The full collection ordered by `updated_at` descending. Ties fall
    /// through to the backend's natural document order, which callers must
    /// not assume stable across snapshots.
    fn list(&self) -> StoreResult<Vec<EcosystemMap>>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: DocumentStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StoreResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StoreResult<Self>;
}
