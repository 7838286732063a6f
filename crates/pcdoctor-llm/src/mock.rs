//! Mock LLM provider for testing
//!
//! Each mock plays one scripted outcome and counts its invocations, which
//! is what the failover and handler tests need to assert attempt order.

use crate::completion::{CompletionRequest, CompletionResponse};
use crate::error::{Error, Result};
use crate::provider::LlmProvider;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared invocation log, recording provider names in call order.
pub type CallLog = Arc<Mutex<Vec<String>>>;

enum Outcome {
    Succeed(String),
    FailApi(String),
    FailNetwork(String),
    InvalidResponse(String),
}

/// A mock provider with a fixed scripted outcome.
pub struct MockProvider {
    name: String,
    outcome: Outcome,
    calls: AtomicUsize,
    log: Option<CallLog>,
}

impl MockProvider {
    fn new(name: &str, outcome: Outcome) -> Self {
        Self {
            name: name.to_string(),
            outcome,
            calls: AtomicUsize::new(0),
            log: None,
        }
    }

    /// A provider whose every call succeeds with the given content.
    #[must_use]
    pub fn succeeding(name: &str, content: &str) -> Self {
        Self::new(name, Outcome::Succeed(content.to_string()))
    }

    /// A provider whose every call fails with an API error.
    #[must_use]
    pub fn failing(name: &str, message: &str) -> Self {
        Self::new(name, Outcome::FailApi(message.to_string()))
    }

    /// A provider whose every call fails with a network error.
    #[must_use]
    pub fn network_failing(name: &str, message: &str) -> Self {
        Self::new(name, Outcome::FailNetwork(message.to_string()))
    }

    /// A provider whose every call fails decoding the response envelope.
    #[must_use]
    pub fn invalid_response(name: &str, message: &str) -> Self {
        Self::new(name, Outcome::InvalidResponse(message.to_string()))
    }

    /// Create a log to share across several mocks.
    #[must_use]
    pub fn shared_log() -> CallLog {
        Arc::new(Mutex::new(Vec::new()))
    }

    /// Record this mock's invocations in a shared log.
    #[must_use]
    pub fn with_log(mut self, log: &CallLog) -> Self {
        self.log = Some(Arc::clone(log));
        self
    }

    /// Number of times `complete` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(log) = &self.log {
            log.lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(self.name.clone());
        }

        match &self.outcome {
            Outcome::Succeed(content) => Ok(CompletionResponse {
                content: content.clone(),
                usage: None,
                finish_reason: Some("stop".to_string()),
                model: "mock-model".to_string(),
            }),
            Outcome::FailApi(message) => Err(Error::Api(message.clone())),
            Outcome::FailNetwork(message) => Err(Error::Network(message.clone())),
            Outcome::InvalidResponse(message) => Err(Error::InvalidResponse(message.clone())),
        }
    }
}
