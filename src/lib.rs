//! @ai:module:intent GitHub Sentinel: source exports, prompt composition, LLM report generation
//! @ai:module:layer application
//! @ai:module:public_api config, error, llm, prompt, report, sources

pub mod config;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod report;
pub mod sources;

pub use config::{BackendKind, SentinelConfig};
pub use error::{BackendError, ConfigError, GenerationError};
pub use llm::{Backend, GenerationOutcome, LlmBackendTrait, MessageSequence, ReportEngine};
pub use prompt::{PromptComposer, PromptTemplates};
pub use report::{GeneratedReport, ReportGenerator, ReportKind, ReportRequest, ReportWriter};
pub use sources::{GitHubClient, HackerNewsClient, Subscriptions};
