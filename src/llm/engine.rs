//! @ai:module:intent Report engine: one logical generation with bounded retry and dry-run
//! @ai:module:layer application
//! @ai:module:public_api ReportEngine, GenerationOutcome
//! @ai:module:stateless false

use crate::config::LlmConfig;
use crate::error::GenerationError;
use crate::llm::backend::LlmBackendTrait;
use crate::llm::message::MessageSequence;
use crate::llm::sleeper::{backoff_delay, SleeperTrait, TokioSleeper};
use crate::prompt::PromptComposer;
use crate::report::ReportRequest;
use std::path::{Path, PathBuf};

/// @ai:intent Result of a successful `generate` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Generated(String),
    /// No model was invoked; the composed messages were written to `path`.
    DryRun { path: PathBuf },
}

impl GenerationOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            GenerationOutcome::Generated(text) => Some(text.as_str()),
            GenerationOutcome::DryRun { .. } => None,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, GenerationOutcome::DryRun { .. })
    }
}

/// @ai:intent Drives a backend with sequential, linearly backed-off attempts
/// @ai:invariant attempts for one request never overlap
pub struct ReportEngine<B: LlmBackendTrait, S: SleeperTrait = TokioSleeper> {
    backend: B,
    composer: PromptComposer,
    max_retries: u32,
    dry_run_path: Option<PathBuf>,
    sleeper: S,
}

impl<B: LlmBackendTrait> ReportEngine<B> {
    /// @ai:intent Create an engine from configuration
    /// @ai:effects pure
    pub fn new(backend: B, config: &LlmConfig) -> Self {
        Self::with_sleeper(backend, config, TokioSleeper)
    }
}

impl<B: LlmBackendTrait, S: SleeperTrait> ReportEngine<B, S> {
    /// @ai:intent Create an engine with a custom sleeper (for testing)
    /// @ai:effects pure
    pub fn with_sleeper(backend: B, config: &LlmConfig, sleeper: S) -> Self {
        Self {
            backend,
            composer: PromptComposer::from_config(config),
            max_retries: config.max_retries,
            dry_run_path: config.dry_run.then(|| config.dry_run_path.clone()),
            sleeper,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// @ai:intent Generate report text for a task prompt and raw content
    /// @ai:post on Err(Exhausted) exactly max_retries + 1 dispatches were made
    /// @ai:effects network, fs:write (dry-run only), time
    pub async fn generate(
        &self,
        system_prompt: &str,
        user_content: Option<&str>,
    ) -> Result<GenerationOutcome, GenerationError> {
        let messages = self.composer.messages(system_prompt, user_content);

        if let Some(path) = &self.dry_run_path {
            Self::write_dry_run(path, &messages)?;
            tracing::info!("Dry run: messages written to {}, no model call made", path.display());
            return Ok(GenerationOutcome::DryRun { path: path.clone() });
        }

        let total = self.max_attempts();
        let mut attempt = 1;

        loop {
            match self.backend.dispatch(&messages).await {
                Ok(text) => {
                    if attempt > 1 {
                        tracing::info!("Report generated on attempt {}/{}", attempt, total);
                    }
                    return Ok(GenerationOutcome::Generated(text));
                }
                Err(err) => {
                    tracing::warn!(
                        "Report generation attempt {}/{} via {} failed: {}",
                        attempt,
                        total,
                        self.backend.name(),
                        err
                    );

                    if attempt >= total {
                        tracing::error!(
                            "Report generation still failing after {} attempt(s)",
                            total
                        );
                        return Err(GenerationError::Exhausted {
                            attempts: total,
                            source: err,
                        });
                    }

                    self.sleeper.sleep(backoff_delay(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }

    /// @ai:intent Generate a report for a prepared request
    /// @ai:effects network, fs:write (dry-run only), time
    pub async fn generate_report(
        &self,
        request: &ReportRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        tracing::debug!("Generating {} report", request.kind.display_name());
        self.generate(&request.task_prompt, Some(&request.raw_content)).await
    }

    /// @ai:effects fs:write
    fn write_dry_run(path: &Path, messages: &MessageSequence) -> Result<(), GenerationError> {
        let json = serde_json::to_string_pretty(messages)?;
        let io_err = |source| GenerationError::DryRun {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, json).map_err(io_err)
    }
}
