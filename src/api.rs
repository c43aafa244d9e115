//! Transport-independent service layer.
//!
//! `EcosystemService` is the single entry point for consumer-facing
//! operations. UI layers call these methods — they never reach into the
//! store client, extractor, or session reducer directly.
//!
//! A background pump task feeds subscription snapshots into the shared
//! session; callers therefore observe their own writes through each write's
//! return value, not through the session — there is no synchronous
//! read-after-write via the feed.

use crate::extract::{ExtractError, ImageData, VisionExtractor};
use crate::schema::{EcosystemMap, MapCandidate, MapPatch};
use crate::session::MapSession;
use crate::store::{MapStoreClient, StoreResult};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Single entry point for all consumer-facing operations.
pub struct EcosystemService {
    store: Arc<MapStoreClient>,
    extractor: VisionExtractor,
    session: Arc<Mutex<MapSession>>,
    pump: JoinHandle<()>,
}

impl EcosystemService {
    /// Wire the service together and start the snapshot pump.
    ///
    /// The session is seeded with the current collection so reads work
    /// immediately; every subsequent store change arrives through the
    /// subscription.
    pub fn start(store: Arc<MapStoreClient>, extractor: VisionExtractor) -> Self {
        let session = Arc::new(Mutex::new(MapSession::new()));

        if let Ok(snapshot) = store.list_current() {
            session
                .lock()
                .expect("session mutex poisoned")
                .apply_snapshot(snapshot);
        }

        let pump_store = Arc::clone(&store);
        let pump_session = Arc::clone(&session);
        let pump = tokio::spawn(async move {
            let mut subscription = pump_store.subscribe().await;
            while let Some(snapshot) = subscription.next().await {
                tracing::trace!(maps = snapshot.len(), "snapshot delivered to session");
                pump_session
                    .lock()
                    .expect("session mutex poisoned")
                    .apply_snapshot(snapshot);
            }
        });

        Self {
            store,
            extractor,
            session,
            pump,
        }
    }

    // --- Read ---

    /// The collection as last delivered, newest-first.
    pub fn list_maps(&self) -> Vec<EcosystemMap> {
        self.session
            .lock()
            .expect("session mutex poisoned")
            .maps()
            .to_vec()
    }

    /// The currently selected map, if any.
    pub fn current_map(&self) -> Option<EcosystemMap> {
        self.session
            .lock()
            .expect("session mutex poisoned")
            .selected_map()
            .cloned()
    }

    // --- Selection ---

    /// Switch selection to a map present in the last snapshot.
    pub fn select_map(&self, id: &str) -> bool {
        self.session
            .lock()
            .expect("session mutex poisoned")
            .select(id)
    }

    // --- Write ---

    /// Persist a map (upsert). Blank ids are assigned at the store.
    pub async fn create_or_replace_map(&self, map: EcosystemMap) -> StoreResult<EcosystemMap> {
        self.store.save(map).await
    }

    /// Merge-patch a subset of a map's fields.
    pub async fn patch_map(&self, id: &str, patch: MapPatch) -> StoreResult<()> {
        self.store.update(id, patch).await
    }

    /// Rename is a patch of `name`, not a distinct store operation.
    pub async fn rename_map(&self, id: &str, name: impl Into<String>) -> StoreResult<()> {
        self.store.update(id, MapPatch::new().with_name(name)).await
    }

    /// Remove a map. Idempotent at this layer; returns whether a document
    /// actually went away so UIs can report a stale id.
    pub async fn delete_map(&self, id: &str) -> StoreResult<bool> {
        self.store.delete(id).await
    }

    // --- Extraction ---

    /// Run vision extraction over an uploaded diagram. The candidate is
    /// returned, never persisted — saving is an explicit second step.
    pub async fn import_from_image(&self, image: &ImageData) -> Result<MapCandidate, ExtractError> {
        self.extractor.extract(image).await
    }

    /// Tear the session down, unsubscribing from the store feed.
    pub fn shutdown(self) {
        self.pump.abort();
    }
}

impl Drop for EcosystemService {
    fn drop(&mut self) {
        self.pump.abort();
    }
}
