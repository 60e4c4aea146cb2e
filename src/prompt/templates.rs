//! @ai:module:intent Task prompt templates per report kind
//! @ai:module:layer infrastructure
//! @ai:module:public_api PromptTemplates
//! @ai:module:stateless true

use crate::report::ReportKind;
use anyhow::{Context, Result};
use std::path::Path;

const BUILTIN_GITHUB_PROGRESS: &str = include_str!("../../prompts/github_progress.md");
const BUILTIN_HACKER_NEWS_TREND: &str = include_str!("../../prompts/hacker_news_trend.md");

/// @ai:intent Task prompts loaded from files, falling back to the built-in copies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    pub github_progress: String,
    pub hacker_news_trend: String,
}

impl PromptTemplates {
    /// @ai:effects pure
    pub fn builtin() -> Self {
        Self {
            github_progress: BUILTIN_GITHUB_PROGRESS.to_string(),
            hacker_news_trend: BUILTIN_HACKER_NEWS_TREND.to_string(),
        }
    }

    /// @ai:intent Load prompt templates from directory
    /// @ai:post a kind without a `<kind>.md` file keeps its built-in prompt
    /// @ai:effects fs:read
    pub fn load(prompts_dir: &Path) -> Result<Self> {
        let mut templates = Self::builtin();

        for kind in ReportKind::all() {
            let path = prompts_dir.join(kind.template_file());
            if !path.exists() {
                tracing::debug!(
                    "No {} prompt at {}, using built-in template",
                    kind.display_name(),
                    path.display()
                );
                continue;
            }

            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read prompt template: {}", path.display()))?;
            *templates.slot_mut(kind) = content;
        }

        Ok(templates)
    }

    /// @ai:effects pure
    pub fn for_kind(&self, kind: ReportKind) -> &str {
        match kind {
            ReportKind::GitHubProgress => &self.github_progress,
            ReportKind::HackerNewsTrend => &self.hacker_news_trend,
        }
    }

    fn slot_mut(&mut self, kind: ReportKind) -> &mut String {
        match kind {
            ReportKind::GitHubProgress => &mut self.github_progress,
            ReportKind::HackerNewsTrend => &mut self.hacker_news_trend,
        }
    }
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self::builtin()
    }
}
