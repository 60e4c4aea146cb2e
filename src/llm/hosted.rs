//! @ai:module:intent Hosted chat-completion API adapter
//! @ai:module:layer infrastructure
//! @ai:module:public_api HostedApiBackend
//! @ai:module:stateless false

use crate::config::LlmConfig;
use crate::error::{BackendError, ConfigError};
use crate::llm::backend::{build_http_client, post_json, LlmBackendTrait};
use crate::llm::message::MessageSequence;
use serde::{Deserialize, Serialize};

const BACKEND_NAME: &str = "hosted-api";

/// @ai:intent Chat-completion request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a MessageSequence,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// @ai:intent Client for an OpenAI-compatible `/chat/completions` endpoint
pub struct HostedApiBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    api_key: String,
}

impl std::fmt::Debug for HostedApiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedApiBackend")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl HostedApiBackend {
    /// @ai:intent Create a backend using the credential from the configured env var
    /// @ai:effects env
    pub fn from_env(config: &LlmConfig) -> Result<Self, ConfigError> {
        let api_key = std::env::var(&config.hosted.api_key_env).ok();
        Self::new(config, api_key)
    }

    /// @ai:intent Create a backend with an explicit credential
    /// @ai:pre api_key is present and non-blank, otherwise MissingCredential
    /// @ai:effects pure
    pub fn new(config: &LlmConfig, api_key: Option<String>) -> Result<Self, ConfigError> {
        let var = &config.hosted.api_key_env;
        let api_key = match api_key.filter(|key| !key.trim().is_empty()) {
            Some(key) => key,
            None => {
                let err = ConfigError::MissingCredential {
                    var: var.clone(),
                    remediation: format!(
                        "Set it in your shell: export {var}='your-api-key'\n\
                         or persist it in your shell profile: \
                         echo 'export {var}=\"sk-...\"' >> ~/.profile\n\
                         or switch `llm.backend` to `localserved` in the config file."
                    ),
                };
                tracing::error!("{}", err);
                return Err(err);
            }
        };

        Ok(Self {
            client: build_http_client(config.timeout())?,
            endpoint: format!(
                "{}/chat/completions",
                config.hosted.base_url.trim_end_matches('/')
            ),
            model: config.hosted.model.clone(),
            temperature: config.temperature,
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// @ai:intent Pull the first completion's text out of a decoded reply
    /// @ai:effects pure
    fn extract_content(value: serde_json::Value) -> Result<String, BackendError> {
        let response: ChatResponse =
            serde_json::from_value(value).map_err(|e| BackendError::ResponseShape {
                backend: BACKEND_NAME,
                detail: format!("unexpected completion format: {}", e),
            })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BackendError::ResponseShape {
                backend: BACKEND_NAME,
                detail: "missing `choices[0].message.content`".to_string(),
            })
    }
}

impl LlmBackendTrait for HostedApiBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    /// @ai:effects network
    async fn dispatch(&self, messages: &MessageSequence) -> Result<String, BackendError> {
        tracing::info!("Generating report with hosted model {}", self.model);

        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        let value = post_json(
            &self.client,
            &self.endpoint,
            Some(self.api_key.as_str()),
            &request,
            BACKEND_NAME,
        )
        .await?;
        tracing::debug!("Hosted API response: {}", value);

        Self::extract_content(value)
    }
}
