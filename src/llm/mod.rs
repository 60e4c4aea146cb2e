//! @ai:module:intent LLM backends and the report engine that drives them
//! @ai:module:layer infrastructure
//! @ai:module:public_api Backend, LlmBackendTrait, ReportEngine, GenerationOutcome, MessageSequence

pub mod backend;
pub mod engine;
pub mod hosted;
pub mod local;
pub mod message;
#[cfg(test)]
pub(crate) mod mock;
pub mod sleeper;

pub use backend::{Backend, LlmBackendTrait};
pub use engine::{GenerationOutcome, ReportEngine};
pub use hosted::HostedApiBackend;
pub use local::LocalServedBackend;
pub use message::{Message, MessageSequence, Role};
pub use sleeper::{backoff_delay, SleeperTrait, TokioSleeper};
