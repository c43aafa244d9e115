//! Async client over the shared `ecosystems` collection
//!
//! Owns write stamping, merge-patch semantics, and the live subscription
//! feed. Every mutation commits through an internal write lock, so commit
//! order under concurrency is lock order — last writer wins, there is no
//! optimistic-concurrency token.
//!
//! A client built with `detached()` has no backend: all operations degrade
//! to benign no-ops (empty collection, no-op writes) instead of erroring,
//! so a missing store never takes dependent consumers down with it.

use super::traits::{DocumentStore, StoreError, StoreResult};
use crate::schema::{self, EcosystemMap, MapPatch};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// The full ordered collection of maps, newest-first. Each delivery is a
/// complete snapshot, never a diff.
pub type Snapshot = Vec<EcosystemMap>;

type SubscriberRegistry = DashMap<u64, mpsc::UnboundedSender<Snapshot>>;

/// A live feed of collection snapshots.
///
/// The current snapshot is delivered immediately on registration; after
/// that, one delivery (at least) per committed change. Dropping the
/// subscription unsubscribes.
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<Snapshot>,
    registry: Arc<SubscriberRegistry>,
}

impl Subscription {
    /// Wait for the next snapshot. `None` once the client is gone.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.remove(&self.id);
    }
}

/// Client handle over the shared map collection.
pub struct MapStoreClient {
    backend: Option<Arc<dyn DocumentStore>>,
    subscribers: Arc<SubscriberRegistry>,
    next_subscriber: AtomicU64,
    /// Serializes read-merge-write cycles so merge-patches commit atomically.
    write_lock: tokio::sync::Mutex<()>,
}

impl MapStoreClient {
    pub fn new(backend: Arc<dyn DocumentStore>) -> Self {
        Self {
            backend: Some(backend),
            subscribers: Arc::new(DashMap::new()),
            next_subscriber: AtomicU64::new(0),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// A client with no backing store. Writes become no-ops, reads become
    /// empty collections, and subscriptions deliver a single empty snapshot.
    pub fn detached() -> Self {
        Self {
            backend: None,
            subscribers: Arc::new(DashMap::new()),
            next_subscriber: AtomicU64::new(0),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn is_detached(&self) -> bool {
        self.backend.is_none()
    }

    /// Idempotent upsert.
    ///
    /// Generates an identifier when `map.id` is blank, stamps `updated_at`
    /// at the moment of the write (strictly after the stored value for the
    /// same id), and sets `created_at` only on first insertion — a save
    /// never clobbers an existing `created_at`. Returns the map as written.
    pub async fn save(&self, mut map: EcosystemMap) -> StoreResult<EcosystemMap> {
        schema::check_references(&map.nodes, &map.edges)?;

        let backend = match &self.backend {
            Some(backend) => backend,
            None => {
                if map.is_unsaved() {
                    map.id = Uuid::new_v4().to_string();
                }
                return Ok(map);
            }
        };

        let _write = self.write_lock.lock().await;

        if map.is_unsaved() {
            map.id = Uuid::new_v4().to_string();
        }

        let existing = backend.get(&map.id)?;
        let now = Utc::now();
        match &existing {
            Some(prev) => {
                map.created_at = prev.created_at;
                map.updated_at = next_stamp(now, prev.updated_at);
            }
            None => {
                map.created_at = now;
                map.updated_at = now;
            }
        }

        backend.put(&map)?;
        tracing::debug!(id = %map.id, fresh = existing.is_none(), "map saved");
        self.notify(backend);
        Ok(map)
    }

    /// Merge-patch a subset of fields.
    ///
    /// Untouched fields are preserved from the pre-update document, the
    /// merged result is re-validated, and `updated_at` is bumped. Fails
    /// with `NotFound` when the id is absent.
    pub async fn update(&self, id: &str, patch: MapPatch) -> StoreResult<()> {
        let backend = match &self.backend {
            Some(backend) => backend,
            None => return Ok(()),
        };

        let _write = self.write_lock.lock().await;

        let mut map = backend
            .get(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let prev_updated = map.updated_at;

        patch.apply_to(&mut map);
        schema::check_references(&map.nodes, &map.edges)?;
        map.updated_at = next_stamp(Utc::now(), prev_updated);

        backend.put(&map)?;
        tracing::debug!(id = %map.id, "map patched");
        self.notify(backend);
        Ok(())
    }

    /// Remove a document. Idempotent: deleting an absent id is `Ok(false)`,
    /// not an error. Subscribers are notified only when a document actually
    /// went away.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let backend = match &self.backend {
            Some(backend) => backend,
            None => return Ok(false),
        };

        let _write = self.write_lock.lock().await;

        let removed = backend.remove(id)?;
        if removed {
            tracing::debug!(id, "map deleted");
            self.notify(backend);
        }
        Ok(removed)
    }

    /// One-shot ordered snapshot of the collection.
    pub fn list_current(&self) -> StoreResult<Snapshot> {
        match &self.backend {
            Some(backend) => backend.list(),
            None => Ok(Vec::new()),
        }
    }

    /// Register a live feed. The current snapshot is queued before this
    /// returns, so the first `next()` resolves without waiting for a write.
    ///
    /// Registration holds the write lock: no commit can land between the
    /// initial snapshot and the registry insertion, so a subscriber never
    /// misses a change or sees one reordered behind a stale initial.
    pub async fn subscribe(&self) -> Subscription {
        let _write = self.write_lock.lock().await;

        let (tx, rx) = mpsc::unbounded_channel();

        let initial = match self.list_current() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "initial snapshot unavailable, delivering empty");
                Vec::new()
            }
        };
        let _ = tx.send(initial);

        let id = self.next_subscriber.fetch_add(1, Ordering::Relaxed);
        self.subscribers.insert(id, tx);
        Subscription {
            id,
            rx,
            registry: Arc::clone(&self.subscribers),
        }
    }

    /// Fan the current snapshot out to every live subscriber, pruning the
    /// ones whose receiving end is gone.
    fn notify(&self, backend: &Arc<dyn DocumentStore>) {
        let snapshot = match backend.list() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "snapshot fan-out skipped");
                return;
            }
        };
        self.subscribers
            .retain(|_, tx| tx.send(snapshot.clone()).is_ok());
    }
}

/// Write stamp that strictly increases per document even when the wall
/// clock has not advanced past the stored value.
fn next_stamp(now: DateTime<Utc>, prev: DateTime<Utc>) -> DateTime<Utc> {
    if now > prev {
        now
    } else {
        prev + Duration::microseconds(1)
    }
}
