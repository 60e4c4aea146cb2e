//! @ai:module:intent Source exporters that fetch activity and write raw Markdown digests
//! @ai:module:layer infrastructure
//! @ai:module:public_api GitHubClient, HackerNewsClient, Subscriptions

pub mod github;
pub mod hacker_news;
pub mod subscriptions;

pub use github::{GitHubClient, GitHubItem};
pub use hacker_news::{HackerNewsClient, Story};
pub use subscriptions::Subscriptions;

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

const USER_AGENT: &str = concat!("github-sentinel/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout for source API calls.
const SOURCE_TIMEOUT: Duration = Duration::from_secs(10);

/// @ai:effects pure
pub(crate) fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(SOURCE_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// @ai:intent Write an export file, creating parent directories
/// @ai:effects fs:write
pub(crate) fn write_export(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export directory: {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write export: {}", path.display()))
}
