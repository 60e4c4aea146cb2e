//! @ai:module:intent Adapter for a locally served chat model (Ollama-style `/api/chat`)
//! @ai:module:layer infrastructure
//! @ai:module:public_api LocalServedBackend
//! @ai:module:stateless false

use crate::config::LlmConfig;
use crate::error::{BackendError, ConfigError};
use crate::llm::backend::{build_http_client, post_json, LlmBackendTrait};
use crate::llm::message::MessageSequence;
use serde::Serialize;

const BACKEND_NAME: &str = "local-served";

#[derive(Debug, Serialize)]
struct LocalChatRequest<'a> {
    model: &'a str,
    messages: &'a MessageSequence,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

/// @ai:intent Client for a model served on the local network
#[derive(Debug)]
pub struct LocalServedBackend {
    client: reqwest::Client,
    api_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl LocalServedBackend {
    /// @ai:intent Create a local backend; the HTTP client carries the configured timeout
    /// @ai:effects pure
    pub fn new(config: &LlmConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            client: build_http_client(config.timeout())?,
            api_url: config.local.api_url.clone(),
            model: config.local.model.clone(),
            max_tokens: config.local.max_tokens,
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// @ai:intent Read `message.content`; missing, null or empty content is a shape error
    /// @ai:effects pure
    fn extract_content(value: &serde_json::Value) -> Result<String, BackendError> {
        value
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(serde_json::Value::as_str)
            .filter(|content| !content.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                tracing::error!("Could not extract report content from local model response");
                BackendError::ResponseShape {
                    backend: BACKEND_NAME,
                    detail: "missing `message.content`".to_string(),
                }
            })
    }
}

impl LlmBackendTrait for LocalServedBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    /// @ai:effects network
    async fn dispatch(&self, messages: &MessageSequence) -> Result<String, BackendError> {
        tracing::info!("Generating report with local model {}", self.model);

        let request = LocalChatRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: false,
        };

        let value = post_json(&self.client, &self.api_url, None, &request, BACKEND_NAME).await?;
        tracing::debug!("Local model response: {}", value);

        Self::extract_content(&value)
    }
}
