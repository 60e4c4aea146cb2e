//! @ai:module:intent Scripted backend and recording sleeper for tests
//! @ai:module:layer infrastructure

use crate::error::BackendError;
use crate::llm::backend::LlmBackendTrait;
use crate::llm::message::MessageSequence;
use crate::llm::sleeper::SleeperTrait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// @ai:intent Backend that replays queued outcomes and records every dispatch
pub struct ScriptedBackend {
    outcomes: Mutex<VecDeque<Result<String, BackendError>>>,
    fallback_failure: bool,
    dispatched: Mutex<Vec<MessageSequence>>,
}

impl ScriptedBackend {
    /// Fails `failures` times, then returns `response` forever.
    pub fn failing_then(failures: usize, response: &str) -> Self {
        let mut outcomes: VecDeque<_> = (0..failures).map(|i| Err(shape_error(i))).collect();
        outcomes.push_back(Ok(response.to_string()));
        Self {
            outcomes: Mutex::new(outcomes),
            fallback_failure: false,
            dispatched: Mutex::new(Vec::new()),
        }
    }

    pub fn always_failing() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            fallback_failure: true,
            dispatched: Mutex::new(Vec::new()),
        }
    }

    pub fn dispatch_count(&self) -> usize {
        self.dispatched.lock().unwrap().len()
    }

    pub fn dispatched(&self) -> Vec<MessageSequence> {
        self.dispatched.lock().unwrap().clone()
    }
}

fn shape_error(attempt: usize) -> BackendError {
    BackendError::ResponseShape {
        backend: "scripted",
        detail: format!("scripted failure {}", attempt),
    }
}

impl LlmBackendTrait for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn dispatch(&self, messages: &MessageSequence) -> Result<String, BackendError> {
        let attempt = {
            let mut dispatched = self.dispatched.lock().unwrap();
            dispatched.push(messages.clone());
            dispatched.len() - 1
        };

        if self.fallback_failure {
            return Err(shape_error(attempt));
        }

        let mut outcomes = self.outcomes.lock().unwrap();
        match outcomes.pop_front() {
            Some(Ok(text)) => {
                outcomes.push_front(Ok(text.clone()));
                Ok(text)
            }
            Some(Err(err)) => Err(err),
            None => Err(shape_error(attempt)),
        }
    }
}

/// @ai:intent Sleeper that records requested durations without waiting
#[derive(Default)]
pub struct RecordingSleeper {
    calls: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn calls(&self) -> Vec<Duration> {
        self.calls.lock().unwrap().clone()
    }
}

impl SleeperTrait for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.calls.lock().unwrap().push(duration);
    }
}

impl SleeperTrait for std::sync::Arc<RecordingSleeper> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}

/// @ai:intent TCP server that accepts connections and never answers
pub struct SilentServer {
    url: String,
    accept_loop: tokio::task::JoinHandle<()>,
}

impl SilentServer {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let accept_loop = tokio::spawn(async move {
            // Open sockets are held so the client sees a live, silent peer.
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        Self { url, accept_loop }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for SilentServer {
    fn drop(&mut self) {
        self.accept_loop.abort();
    }
}
