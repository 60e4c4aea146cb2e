//! @ai:module:intent Configuration structs for the sentinel
//! @ai:module:layer infrastructure
//! @ai:module:public_api SentinelConfig, LlmConfig, BackendKind, HostedApiConfig, LocalServedConfig
//! @ai:module:stateless true

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// @ai:intent Main configuration, loaded once at startup and read-only afterwards
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentinelConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub hacker_news: HackerNewsConfig,
    #[serde(default)]
    pub paths: PathConfig,
}

/// @ai:intent Which adapter variant the report engine dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BackendKind {
    HostedApi,
    LocalServed,
}

impl BackendKind {
    /// @ai:intent Get string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::HostedApi => "hostedapi",
            BackendKind::LocalServed => "localserved",
        }
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hostedapi" | "openai" => Ok(BackendKind::HostedApi),
            "localserved" | "ollama" => Ok(BackendKind::LocalServed),
            other => Err(ConfigError::UnsupportedBackend(other.to_string())),
        }
    }
}

impl TryFrom<String> for BackendKind {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BackendKind> for String {
    fn from(kind: BackendKind) -> Self {
        kind.as_str().to_string()
    }
}

/// @ai:intent Model backend and generation parameters
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_backend")]
    pub backend: BackendKind,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Replaces the built-in persona block when non-blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_role_base: Option<String>,
    #[serde(default = "default_report_language")]
    pub report_language: String,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default = "default_dry_run_path")]
    pub dry_run_path: PathBuf,
    #[serde(default)]
    pub hosted: HostedApiConfig,
    #[serde(default)]
    pub local: LocalServedConfig,
}

/// @ai:intent Connection parameters for the hosted chat-completion API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostedApiConfig {
    #[serde(default = "default_hosted_base_url")]
    pub base_url: String,
    #[serde(default = "default_hosted_model")]
    pub model: String,
    /// Environment variable holding the credential.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// @ai:intent Connection parameters for a locally served model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalServedConfig {
    #[serde(default = "default_local_api_url")]
    pub api_url: String,
    #[serde(default = "default_local_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// @ai:intent GitHub source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_github_api_url")]
    pub api_url: String,
    #[serde(default = "default_github_token_env")]
    pub token_env: String,
    #[serde(default = "default_subscriptions_file")]
    pub subscriptions_file: PathBuf,
}

/// @ai:intent Hacker News source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HackerNewsConfig {
    #[serde(default = "default_hacker_news_api_url")]
    pub api_url: String,
    #[serde(default = "default_story_limit")]
    pub limit: usize,
}

/// @ai:intent Path configuration for prompts, raw exports and reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            temperature: default_temperature(),
            max_retries: default_max_retries(),
            timeout_seconds: default_timeout_seconds(),
            system_role_base: None,
            report_language: default_report_language(),
            dry_run: false,
            dry_run_path: default_dry_run_path(),
            hosted: HostedApiConfig::default(),
            local: LocalServedConfig::default(),
        }
    }
}

impl Default for HostedApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_hosted_base_url(),
            model: default_hosted_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for LocalServedConfig {
    fn default() -> Self {
        Self {
            api_url: default_local_api_url(),
            model: default_local_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_api_url(),
            token_env: default_github_token_env(),
            subscriptions_file: default_subscriptions_file(),
        }
    }
}

impl Default for HackerNewsConfig {
    fn default() -> Self {
        Self {
            api_url: default_hacker_news_api_url(),
            limit: default_story_limit(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            prompts_dir: default_prompts_dir(),
            export_dir: default_export_dir(),
            reports_dir: default_reports_dir(),
        }
    }
}

fn default_backend() -> BackendKind {
    BackendKind::HostedApi
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_retries() -> u32 {
    2
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_report_language() -> String {
    "English".to_string()
}

fn default_dry_run_path() -> PathBuf {
    PathBuf::from("dry_run/messages.json")
}

fn default_hosted_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_hosted_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_local_api_url() -> String {
    "http://localhost:11434/api/chat".to_string()
}

fn default_local_model() -> String {
    "llama3".to_string()
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_github_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_subscriptions_file() -> PathBuf {
    PathBuf::from("subscriptions.json")
}

fn default_hacker_news_api_url() -> String {
    "https://hacker-news.firebaseio.com/v0".to_string()
}

fn default_story_limit() -> usize {
    30
}

fn default_prompts_dir() -> PathBuf {
    PathBuf::from("prompts")
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("reports")
}

impl LlmConfig {
    /// @ai:intent Per-request timeout applied by both adapters
    /// @ai:effects pure
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl SentinelConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// @ai:effects pure
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
