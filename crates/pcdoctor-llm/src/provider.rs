//! LLM provider trait definition

use crate::completion::{CompletionRequest, CompletionResponse};
use crate::error::Result;

/// Trait for LLM providers
///
/// A provider issues exactly one upstream attempt per `complete` call;
/// retries across credentials belong to [`crate::failover::FailoverChain`].
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logs (must not expose the full API key)
    fn name(&self) -> &str;

    /// Complete a conversation
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}
