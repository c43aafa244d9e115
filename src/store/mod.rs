//! Persistence for ecosystem maps
//!
//! A sync `DocumentStore` backend (sqlite is the primary implementation)
//! under an async `MapStoreClient` that owns write stamping, merge-patch
//! semantics, and the live subscription feed.

mod client;
mod sqlite;
mod traits;

pub use client::{MapStoreClient, Snapshot, Subscription};
pub use sqlite::SqliteStore;
pub use traits::{DocumentStore, OpenStore, StoreError, StoreResult};
