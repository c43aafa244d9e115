//! Common test utilities for ecomap integration suites
//!
//! Shared builders for maps, provider replies, and snapshot-wait polling.

use ecomap::{
    EcosystemEdge, EcosystemMap, EcosystemNode, ImageData, MapStoreClient, NodeType, OpenStore,
    SqliteStore,
};
use std::sync::Arc;
use std::time::Duration;

/// A store client over a fresh in-memory database.
pub fn memory_client() -> Arc<MapStoreClient> {
    Arc::new(MapStoreClient::new(Arc::new(
        SqliteStore::open_in_memory().expect("in-memory store"),
    )))
}

/// An unsaved two-node, one-edge map.
pub fn sample_map(name: &str) -> EcosystemMap {
    EcosystemMap::new(name)
        .with_node(
            EcosystemNode::new("n1", "Consumer Goods Authority", NodeType::Authority)
                .with_position(120.0, 80.0),
        )
        .with_node(
            EcosystemNode::new("n2", "Market Surveillance Unit", NodeType::Service)
                .with_position(480.0, 300.0),
        )
        .with_edge(EcosystemEdge::new("e1", "n1", "n2").with_label("mandates"))
}

/// A tiny valid image payload; the mock client never decodes it.
pub fn test_image() -> ImageData {
    ImageData::new("image/png", "aWJpcw==")
}

/// The single-node provider reply used by the end-to-end scenario.
pub const CGA_REPLY: &str = r#"{"name":"T","nodes":[{"id":"n1","label":"CGA","type":"authority","position":{"x":0,"y":0}}],"edges":[]}"#;

/// Poll until the condition holds or a short deadline passes.
pub async fn wait_until(mut check: impl FnMut() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition did not hold within the deadline");
}
