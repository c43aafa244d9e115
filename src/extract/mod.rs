//! Vision extraction adapter
//!
//! Converts an uploaded diagram image into a validated map candidate via a
//! single round trip to a vision-capable language model. No caching, no
//! partial recovery, no automatic retries — a failed call is reported once
//! and retrying is the caller's responsibility.

mod client;
mod http;
mod prompt;

pub use client::{ImageData, MockVisionClient, VisionClient, VisionError};
pub use http::HttpVisionClient;
pub use prompt::extraction_instructions;

use crate::config::VisionConfig;
use crate::schema::{self, MapCandidate};
use std::sync::Arc;
use thiserror::Error;

/// The two-kind error surface extraction exposes to callers.
///
/// Everything that goes wrong after a credential is present — provider
/// status, malformed JSON, schema violation — collapses into `Failed`;
/// the distinction that matters to the caller's UX is whether operator
/// action is needed before retrying.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("vision provider credential is not configured")]
    ConfigurationMissing,
    #[error("extraction failed: {0}")]
    Failed(String),
}

/// Extracts a map candidate from a diagram image.
pub struct VisionExtractor {
    client: Arc<dyn VisionClient>,
}

impl VisionExtractor {
    pub fn new(client: Arc<dyn VisionClient>) -> Self {
        Self { client }
    }

    /// Build an extractor over the HTTP client configured from the process
    /// environment. A missing credential surfaces here, before any call.
    pub fn from_env() -> Result<Self, ExtractError> {
        let config = VisionConfig::from_env().map_err(|_| ExtractError::ConfigurationMissing)?;
        let client =
            HttpVisionClient::from_config(&config).map_err(|_| ExtractError::ConfigurationMissing)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Run one extraction round trip.
    ///
    /// The returned candidate has passed structural validation but carries
    /// no persistence identifiers; the caller decides whether to save it.
    pub async fn extract(&self, image: &ImageData) -> Result<MapCandidate, ExtractError> {
        let instructions = extraction_instructions();

        let reply = self
            .client
            .describe(&instructions, image)
            .await
            .map_err(|e| match e {
                VisionError::MissingCredential => ExtractError::ConfigurationMissing,
                other => ExtractError::Failed(other.to_string()),
            })?;

        let payload = extract_json(&reply).ok_or_else(|| {
            tracing::warn!("vision reply carried no JSON object");
            ExtractError::Failed(format!(
                "no JSON object in provider reply: {}",
                truncate(&reply, 200)
            ))
        })?;

        let candidate = schema::validate(&payload)
            .map_err(|e| ExtractError::Failed(format!("invalid candidate: {}", e)))?;

        tracing::debug!(
            nodes = candidate.nodes.len(),
            edges = candidate.edges.len(),
            "extraction produced a valid candidate"
        );

        Ok(candidate)
    }
}

/// Pull a JSON object out of the model's reply text.
///
/// The prompt demands bare JSON, but models still occasionally wrap it.
/// Tries, in order: direct parse, a fenced ``` block, the first `{` to the
/// last `}` span.
fn extract_json(text: &str) -> Option<serde_json::Value> {
    let trimmed = text.trim();

    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if v.is_object() {
            return Some(v);
        }
    }

    let fenced = trimmed.find("```").and_then(|start| {
        let after = &trimmed[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        after.find("```").map(|end| &after[..end])
    });
    if let Some(block) = fenced {
        if let Ok(v) = serde_json::from_str::<serde_json::Value>(block.trim()) {
            if v.is_object() {
                return Some(v);
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Ok(v) = serde_json::from_str::<serde_json::Value>(&trimmed[start..=end]) {
                if v.is_object() {
                    return Some(v);
                }
            }
        }
    }

    None
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
