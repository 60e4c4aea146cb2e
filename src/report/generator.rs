//! @ai:module:intent Turn raw export files into persisted reports
//! @ai:module:layer application
//! @ai:module:public_api ReportGenerator, GeneratedReport
//! @ai:module:stateless false

use crate::llm::{GenerationOutcome, LlmBackendTrait, ReportEngine, SleeperTrait, TokioSleeper};
use crate::prompt::PromptTemplates;
use crate::report::{ReportKind, ReportRequest, ReportWriter};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// @ai:intent What a pipeline run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedReport {
    Written { content: String, path: PathBuf },
    /// Dry-run mode: only the composed messages were saved.
    DryRun { messages_path: PathBuf },
}

/// @ai:intent Reads raw exports, asks the engine for a report and saves it
pub struct ReportGenerator<B: LlmBackendTrait, S: SleeperTrait = TokioSleeper> {
    engine: ReportEngine<B, S>,
    templates: PromptTemplates,
    writer: ReportWriter,
}

impl<B: LlmBackendTrait, S: SleeperTrait> ReportGenerator<B, S> {
    /// @ai:effects pure
    pub fn new(
        engine: ReportEngine<B, S>,
        templates: PromptTemplates,
        writer: ReportWriter,
    ) -> Self {
        Self {
            engine,
            templates,
            writer,
        }
    }

    pub fn engine(&self) -> &ReportEngine<B, S> {
        &self.engine
    }

    /// @ai:intent Build the request for a kind from a raw export file
    /// @ai:effects fs:read
    pub fn build_request(&self, kind: ReportKind, raw_file: &Path) -> Result<ReportRequest> {
        let raw_content = std::fs::read_to_string(raw_file)
            .with_context(|| format!("Failed to read raw export: {}", raw_file.display()))?;
        Ok(ReportRequest::new(kind, self.templates.for_kind(kind), raw_content))
    }

    /// @ai:intent Generate and persist a report of `kind` from a raw export file
    /// @ai:effects fs:read, fs:write, network
    pub async fn generate_from_file(
        &self,
        kind: ReportKind,
        raw_file: &Path,
        label: &str,
    ) -> Result<GeneratedReport> {
        let request = self.build_request(kind, raw_file)?;

        let outcome = self
            .engine
            .generate_report(&request)
            .await
            .with_context(|| format!("Failed to generate {} report", kind.display_name()))?;

        match outcome {
            GenerationOutcome::Generated(text) => {
                let (content, path) = self.writer.write(kind, label, &text)?;
                Ok(GeneratedReport::Written { content, path })
            }
            GenerationOutcome::DryRun { path } => {
                Ok(GeneratedReport::DryRun { messages_path: path })
            }
        }
    }

    /// @ai:intent Report on a repository's progress over a date range
    /// @ai:effects fs:read, fs:write, network
    pub async fn generate_github_report(
        &self,
        raw_file: &Path,
        repo: &str,
    ) -> Result<GeneratedReport> {
        let stem = raw_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let label = format!("{}_{}", repo, stem);
        self.generate_from_file(ReportKind::GitHubProgress, raw_file, &label)
            .await
    }

    /// @ai:intent Report on Hacker News top-story trends
    /// @ai:effects fs:read, fs:write, network
    pub async fn generate_hacker_news_report(&self, raw_file: &Path) -> Result<GeneratedReport> {
        self.generate_from_file(ReportKind::HackerNewsTrend, raw_file, "hacker_news_trend")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;
    use crate::llm::mock::{RecordingSleeper, ScriptedBackend};
    use tempfile::TempDir;

    fn generator(
        backend: ScriptedBackend,
        config: &LlmConfig,
        reports_dir: &Path,
    ) -> ReportGenerator<ScriptedBackend, RecordingSleeper> {
        let engine = ReportEngine::with_sleeper(backend, config, RecordingSleeper::default());
        let templates = PromptTemplates {
            github_progress: "Summarize GitHub issues".to_string(),
            hacker_news_trend: "Summarize HN".to_string(),
        };
        ReportGenerator::new(engine, templates, ReportWriter::new(reports_dir))
    }

    #[tokio::test]
    async fn test_github_report_is_written_under_kind_directory() {
        let temp = TempDir::new().unwrap();
        let raw_file = temp.path().join("2024-08-20_to_2024-08-22.md");
        std::fs::write(&raw_file, "- fix bug #1\n- add feature #2").unwrap();

        let generator = generator(
            ScriptedBackend::failing_then(1, "# Progress"),
            &LlmConfig::default(),
            &temp.path().join("reports"),
        );

        let report = generator
            .generate_github_report(&raw_file, "owner/repo")
            .await
            .unwrap();

        match report {
            GeneratedReport::Written { content, path } => {
                assert_eq!(content, "# Progress");
                assert!(path.starts_with(temp.path().join("reports").join("github_progress")));
                let name = path.file_name().unwrap().to_string_lossy().into_owned();
                assert!(name.starts_with("owner_repo_2024-08-20_to_2024-08-22_"));
            }
            other => panic!("expected written report, got {:?}", other),
        }

        let dispatched = generator.engine().backend().dispatched();
        assert_eq!(dispatched.len(), 2);
        assert!(dispatched[0].system().content.ends_with("Summarize GitHub issues"));
        assert_eq!(dispatched[0].user().content, "- fix bug #1\n- add feature #2");
    }

    #[tokio::test]
    async fn test_dry_run_writes_no_report() {
        let temp = TempDir::new().unwrap();
        let raw_file = temp.path().join("top_stories.md");
        std::fs::write(&raw_file, "### 1. Story").unwrap();

        let config = LlmConfig {
            dry_run: true,
            dry_run_path: temp.path().join("dry_run.json"),
            ..Default::default()
        };
        let reports_dir = temp.path().join("reports");
        let generator = generator(ScriptedBackend::always_failing(), &config, &reports_dir);

        let report = generator.generate_hacker_news_report(&raw_file).await.unwrap();

        assert_eq!(
            report,
            GeneratedReport::DryRun {
                messages_path: temp.path().join("dry_run.json")
            }
        );
        assert!(!reports_dir.exists());
        assert_eq!(generator.engine().backend().dispatch_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_raw_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let generator = generator(
            ScriptedBackend::failing_then(0, "unused"),
            &LlmConfig::default(),
            temp.path(),
        );

        let err = generator
            .generate_hacker_news_report(&temp.path().join("missing.md"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to read raw export"));
        assert_eq!(generator.engine().backend().dispatch_count(), 0);
    }
}
