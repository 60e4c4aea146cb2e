//! @ai:module:intent Backend capability trait and the runtime-selected adapter
//! @ai:module:layer infrastructure
//! @ai:module:public_api LlmBackendTrait, Backend
//! @ai:module:stateless false

use crate::config::{BackendKind, LlmConfig};
use crate::error::{BackendError, ConfigError};
use crate::llm::hosted::HostedApiBackend;
use crate::llm::local::LocalServedBackend;
use crate::llm::message::MessageSequence;
use serde::Serialize;
use std::time::Duration;

/// @ai:intent Trait for model backends that turn a message sequence into report text
#[allow(async_fn_in_trait)]
pub trait LlmBackendTrait: Send + Sync {
    /// @ai:intent Short backend name used in logs and errors
    fn name(&self) -> &'static str;

    /// @ai:intent Perform one network round-trip
    /// @ai:effects network
    async fn dispatch(&self, messages: &MessageSequence) -> Result<String, BackendError>;
}

/// @ai:intent Adapter variant chosen once from configuration
/// @ai:invariant the variant never changes after construction
#[derive(Debug)]
pub enum Backend {
    HostedApi(HostedApiBackend),
    LocalServed(LocalServedBackend),
}

impl Backend {
    /// @ai:intent Build the configured adapter, failing fast on missing credentials
    /// @ai:effects env
    pub fn from_config(config: &LlmConfig) -> Result<Self, ConfigError> {
        Ok(match config.backend {
            BackendKind::HostedApi => Backend::HostedApi(HostedApiBackend::from_env(config)?),
            BackendKind::LocalServed => Backend::LocalServed(LocalServedBackend::new(config)?),
        })
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::HostedApi(_) => BackendKind::HostedApi,
            Backend::LocalServed(_) => BackendKind::LocalServed,
        }
    }
}

impl LlmBackendTrait for Backend {
    fn name(&self) -> &'static str {
        match self {
            Backend::HostedApi(backend) => backend.name(),
            Backend::LocalServed(backend) => backend.name(),
        }
    }

    async fn dispatch(&self, messages: &MessageSequence) -> Result<String, BackendError> {
        match self {
            Backend::HostedApi(backend) => backend.dispatch(messages).await,
            Backend::LocalServed(backend) => backend.dispatch(messages).await,
        }
    }
}

/// @ai:intent Build an HTTP client with an explicit per-request timeout
/// @ai:effects pure
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(ConfigError::HttpClient)
}

/// @ai:intent POST a JSON body and decode the JSON reply, normalizing every failure
/// @ai:effects network
pub(crate) async fn post_json<T: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: &str,
    bearer: Option<&str>,
    body: &T,
    backend: &'static str,
) -> Result<serde_json::Value, BackendError> {
    let mut request = client.post(url).json(body);
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .await
        .map_err(|source| BackendError::Transport { backend, source })?;

    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BackendError::Status {
            backend,
            status: status.as_u16(),
            body,
        });
    }

    let text = response
        .text()
        .await
        .map_err(|source| BackendError::Transport { backend, source })?;

    serde_json::from_str(&text).map_err(|e| BackendError::ResponseShape {
        backend,
        detail: format!("body is not valid JSON: {}", e),
    })
}
