//! HTTP transport for the vision provider
//!
//! One OpenAI-compatible chat-completions request per extraction. The
//! request timeout is explicit and configurable; there is no retry or
//! backoff here — retrying is the caller's decision.

use super::client::{ImageData, VisionClient, VisionError};
use crate::config::VisionConfig;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

/// Vision client backed by a hosted chat-completions endpoint.
#[derive(Debug)]
pub struct HttpVisionClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl HttpVisionClient {
    /// Build a client from resolved configuration.
    pub fn from_config(config: &VisionConfig) -> Result<Self, VisionError> {
        Self::new(&config.api_url, &config.api_key, &config.model, config.timeout)
    }

    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, VisionError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(VisionError::MissingCredential);
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VisionError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            api_url: api_url.into(),
            api_key,
            model: model.into(),
        })
    }

    fn request_body(&self, instructions: &str, image: &ImageData) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": instructions },
                    { "type": "image_url", "image_url": { "url": image.to_data_uri() } }
                ]
            }]
        })
    }
}

#[async_trait]
impl VisionClient for HttpVisionClient {
    async fn describe(&self, instructions: &str, image: &ImageData) -> Result<String, VisionError> {
        tracing::debug!(model = %self.model, "issuing vision extraction request");

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(instructions, image))
            .send()
            .await
            .map_err(|e| VisionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VisionError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "vision provider returned non-success");
            return Err(VisionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| VisionError::Transport(e.to_string()))?;
        let content = parsed["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(VisionError::EmptyResponse)?;

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpVisionClient {
        HttpVisionClient::new(
            "https://provider.example/v1/chat/completions",
            "sk-test",
            "vision-model",
            Duration::from_secs(60),
        )
        .unwrap()
    }

    #[test]
    fn blank_credential_is_a_configuration_error() {
        let err = HttpVisionClient::new(
            "https://provider.example",
            "  ",
            "vision-model",
            Duration::from_secs(60),
        )
        .unwrap_err();
        assert!(matches!(err, VisionError::MissingCredential));
    }

    #[test]
    fn request_body_carries_prompt_and_image_inline() {
        let image = ImageData::new("image/png", "Zm9v");
        let body = client().request_body("extract the graph", &image);

        assert_eq!(body["model"], "vision-model");
        let content = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content[0]["text"], "extract the graph");
        assert_eq!(
            content[1]["image_url"]["url"],
            "data:image/png;base64,Zm9v"
        );
    }
}
