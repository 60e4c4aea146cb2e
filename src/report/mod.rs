//! @ai:module:intent Report kinds, requests and the generate-then-persist pipeline
//! @ai:module:layer application
//! @ai:module:public_api ReportKind, ReportRequest, ReportGenerator, GeneratedReport, ReportWriter

pub mod generator;
pub mod writer;

pub use generator::{GeneratedReport, ReportGenerator};
pub use writer::ReportWriter;

/// @ai:intent Which pipeline a request belongs to; selects the task prompt template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    GitHubProgress,
    HackerNewsTrend,
}

impl ReportKind {
    /// @ai:intent Get string representation, also used for template and directory names
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::GitHubProgress => "github_progress",
            ReportKind::HackerNewsTrend => "hacker_news_trend",
        }
    }

    /// @ai:effects pure
    pub fn display_name(&self) -> &'static str {
        match self {
            ReportKind::GitHubProgress => "GitHub progress",
            ReportKind::HackerNewsTrend => "Hacker News trend",
        }
    }

    pub fn template_file(&self) -> String {
        format!("{}.md", self.as_str())
    }

    pub fn all() -> [ReportKind; 2] {
        [ReportKind::GitHubProgress, ReportKind::HackerNewsTrend]
    }
}

/// @ai:intent Immutable input of one report generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub kind: ReportKind,
    pub task_prompt: String,
    pub raw_content: String,
}

impl ReportRequest {
    /// @ai:effects pure
    pub fn new(
        kind: ReportKind,
        task_prompt: impl Into<String>,
        raw_content: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            task_prompt: task_prompt.into(),
            raw_content: raw_content.into(),
        }
    }
}
