//! @ai:module:intent Backoff timing between report generation attempts
//! @ai:module:layer infrastructure
//! @ai:module:public_api SleeperTrait, TokioSleeper, backoff_delay
//! @ai:module:stateless true

use std::time::Duration;

/// Seconds added to the wait after each failed attempt.
pub const BACKOFF_STEP_SECS: f64 = 1.0;

/// @ai:intent Trait for suspending the current request between attempts
pub trait SleeperTrait: Send + Sync {
    /// @ai:intent Wait for the given duration
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// @ai:intent Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl SleeperTrait for TokioSleeper {
    /// @ai:effects time
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// @ai:intent Linear backoff: attempt 1 waits one step, attempt 2 waits two steps
/// @ai:pre attempt >= 1
/// @ai:effects pure
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs_f64(BACKOFF_STEP_SECS * attempt as f64)
}
