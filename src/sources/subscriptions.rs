//! @ai:module:intent Subscribed repository list stored as a JSON array
//! @ai:module:layer infrastructure
//! @ai:module:public_api Subscriptions

use crate::sources::github::validate_repo;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// @ai:intent Ordered, duplicate-free list of `owner/repo` names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscriptions {
    repos: Vec<String>,
}

impl Subscriptions {
    /// @ai:intent Load subscriptions; a missing file is an empty list
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No subscriptions file at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read subscriptions: {}", path.display()))?;
        let repos: Vec<String> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse subscriptions: {}", path.display()))?;

        let mut subscriptions = Self::default();
        for repo in repos {
            subscriptions.push_unique(repo);
        }
        Ok(subscriptions)
    }

    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.repos)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write subscriptions: {}", path.display()))
    }

    pub fn list(&self) -> &[String] {
        &self.repos
    }

    /// @ai:intent Repositories to report on: the explicit one, else every subscription
    /// @ai:post Ok is never empty
    pub fn report_targets(&self, explicit: Option<&str>) -> Result<Vec<String>> {
        match explicit {
            Some(repo) => {
                validate_repo(repo)?;
                Ok(vec![repo.to_string()])
            }
            None if self.repos.is_empty() => bail!(
                "No repository given and no subscriptions found. \
                 Pass --repo owner/repo or run: sentinel subscriptions add owner/repo"
            ),
            None => Ok(self.repos.clone()),
        }
    }

    /// @ai:intent Add a repository; returns false if it was already subscribed
    pub fn add(&mut self, repo: &str) -> Result<bool> {
        validate_repo(repo)?;
        Ok(self.push_unique(repo.to_string()))
    }

    /// @ai:intent Remove a repository; returns false if it was not subscribed
    pub fn remove(&mut self, repo: &str) -> bool {
        let before = self.repos.len();
        self.repos.retain(|r| r != repo);
        self.repos.len() != before
    }

    fn push_unique(&mut self, repo: String) -> bool {
        if self.repos.contains(&repo) {
            return false;
        }
        self.repos.push(repo);
        true
    }
}
