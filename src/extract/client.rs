//! Vision provider client — trait, image payload, and mock
//!
//! Defines the client seam for calling a vision-capable language model.
//! Two implementations:
//! - `HttpVisionClient`: single HTTP request to a hosted provider (production)
//! - `MockVisionClient`: returns preconfigured responses (testing)

use async_trait::async_trait;
use base64::Engine as _;
use std::sync::Mutex;
use thiserror::Error;

/// Image content handed to the vision provider, base64-encoded with its
/// media type. Any format the provider accepts is legal here.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub media_type: String,
    pub base64: String,
}

impl ImageData {
    pub fn new(media_type: impl Into<String>, base64: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            base64: base64.into(),
        }
    }

    /// Encode raw image bytes.
    pub fn from_bytes(media_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            media_type: media_type.into(),
            base64: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Parse a `data:<media>;base64,<payload>` URI.
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix("data:")?;
        let (media_type, payload) = rest.split_once(";base64,")?;
        if media_type.is_empty() || payload.is_empty() {
            return None;
        }
        Some(Self::new(media_type, payload))
    }

    /// Render as a data URI, the wire form hosted providers accept inline.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.base64)
    }
}

/// Errors from vision client operations.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("vision provider credential is not configured")]
    MissingCredential,
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider response carried no content")]
    EmptyResponse,
}

/// Client seam for the vision-capable language model.
///
/// Abstracts over transport (HTTP, mock) so the extractor does not depend on
/// how the provider is reached. One call, one fresh round trip — the
/// provider is not deterministic and nothing here caches.
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Send the instruction prompt and image, returning the model's raw
    /// text reply.
    async fn describe(&self, instructions: &str, image: &ImageData) -> Result<String, VisionError>;
}

/// Mock client for testing — deterministic, preconfigured replies.
pub struct MockVisionClient {
    responses: Mutex<Vec<Result<String, VisionError>>>,
}

impl MockVisionClient {
    /// A client that answers every call with the same text.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(vec![Ok(text.into())]),
        }
    }

    /// A client that fails every call with the given error.
    pub fn failing(error: VisionError) -> Self {
        Self {
            responses: Mutex::new(vec![Err(error)]),
        }
    }

    /// Queue an additional reply; replies are consumed in order, and the
    /// last one repeats once the queue is drained.
    pub fn then(self, reply: Result<String, VisionError>) -> Self {
        self.responses.lock().unwrap().push(reply);
        self
    }
}

#[async_trait]
impl VisionClient for MockVisionClient {
    async fn describe(
        &self,
        _instructions: &str,
        _image: &ImageData,
    ) -> Result<String, VisionError> {
        let mut queue = self.responses.lock().unwrap();
        let reply = if queue.len() > 1 {
            queue.remove(0)
        } else {
            clone_reply(&queue[0])
        };
        reply
    }
}

fn clone_reply(reply: &Result<String, VisionError>) -> Result<String, VisionError> {
    match reply {
        Ok(text) => Ok(text.clone()),
        Err(VisionError::MissingCredential) => Err(VisionError::MissingCredential),
        Err(VisionError::Status { status, body }) => Err(VisionError::Status {
            status: *status,
            body: body.clone(),
        }),
        Err(VisionError::Transport(msg)) => Err(VisionError::Transport(msg.clone())),
        Err(VisionError::EmptyResponse) => Err(VisionError::EmptyResponse),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> ImageData {
        ImageData::new("image/png", "aGVsbG8=")
    }

    #[tokio::test]
    async fn mock_client_returns_configured_reply() {
        let client = MockVisionClient::replying("{\"ok\":true}");
        let reply = client.describe("prompt", &png()).await.unwrap();
        assert_eq!(reply, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn mock_client_repeats_last_reply() {
        let client = MockVisionClient::replying("a");
        assert_eq!(client.describe("p", &png()).await.unwrap(), "a");
        assert_eq!(client.describe("p", &png()).await.unwrap(), "a");
    }

    #[tokio::test]
    async fn mock_client_consumes_queued_replies_in_order() {
        let client = MockVisionClient::replying("first").then(Ok("second".to_string()));
        assert_eq!(client.describe("p", &png()).await.unwrap(), "first");
        assert_eq!(client.describe("p", &png()).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn mock_client_surfaces_configured_failure() {
        let client = MockVisionClient::failing(VisionError::Status {
            status: 503,
            body: "overloaded".to_string(),
        });
        let err = client.describe("p", &png()).await.unwrap_err();
        assert!(matches!(err, VisionError::Status { status: 503, .. }));
    }

    #[test]
    fn data_uri_round_trip() {
        let image = ImageData::new("image/jpeg", "Zm9v");
        let uri = image.to_data_uri();
        assert_eq!(uri, "data:image/jpeg;base64,Zm9v");
        assert_eq!(ImageData::from_data_uri(&uri), Some(image));
    }

    #[test]
    fn malformed_data_uri_is_rejected() {
        assert!(ImageData::from_data_uri("data:image/png,plain").is_none());
        assert!(ImageData::from_data_uri("http://x/img.png").is_none());
        assert!(ImageData::from_data_uri("data:;base64,Zm9v").is_none());
    }

    #[test]
    fn from_bytes_encodes_base64() {
        let image = ImageData::from_bytes("image/png", b"foo");
        assert_eq!(image.base64, "Zm9v");
    }
}
