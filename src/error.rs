//! @ai:module:intent Define error types for configuration, backend dispatch and report generation
//! @ai:module:layer domain
//! @ai:module:public_api ConfigError, BackendError, GenerationError
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Errors raised while building configuration or backends; never retried
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unsupported backend kind: {0} (expected `hostedapi` or `localserved`)")]
    UnsupportedBackend(String),

    #[error("{var} is not set.\n{remediation}")]
    MissingCredential { var: String, remediation: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// @ai:intent Normalized failure of a single backend attempt
/// @ai:invariant every adapter maps all of its failure modes into one of these variants
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection refused, timeout, broken body stream.
    #[error("{backend} request failed: {source}")]
    Transport {
        backend: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{backend} returned HTTP {status}: {body}")]
    Status {
        backend: &'static str,
        status: u16,
        body: String,
    },

    /// Transport succeeded but the body lacks the expected content field.
    #[error("{backend} returned an invalid response: {detail}")]
    ResponseShape {
        backend: &'static str,
        detail: String,
    },
}

impl BackendError {
    /// @ai:intent Name of the backend that produced this error
    /// @ai:effects pure
    pub fn backend(&self) -> &'static str {
        match self {
            BackendError::Transport { backend, .. }
            | BackendError::Status { backend, .. }
            | BackendError::ResponseShape { backend, .. } => backend,
        }
    }

    pub fn is_response_shape(&self) -> bool {
        matches!(self, BackendError::ResponseShape { .. })
    }
}

/// @ai:intent Errors surfaced by the report engine to its callers
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Report generation failed after {attempts} attempt(s): {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: BackendError,
    },

    #[error("Failed to write dry-run messages to {path}: {source}")]
    DryRun {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize messages: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl GenerationError {
    /// @ai:intent Last backend failure when attempts were exhausted
    /// @ai:effects pure
    pub fn last_backend_error(&self) -> Option<&BackendError> {
        match self {
            GenerationError::Exhausted { source, .. } => Some(source),
            _ => None,
        }
    }
}
