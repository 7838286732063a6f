//! Linear credential failover
//!
//! Tries one provider per configured key, in order, stopping at the first
//! success. No backoff and no state across requests; a failed key is tried
//! again on the next request.

use crate::completion::{CompletionRequest, CompletionResponse};
use crate::credentials::CredentialPool;
use crate::error::{Error, Result};
use crate::openrouter::{OpenRouterConfig, OpenRouterProvider};
use crate::provider::LlmProvider;
use std::sync::Arc;
use tracing::warn;

/// Ordered chain of providers, one per upstream credential.
pub struct FailoverChain {
    providers: Vec<Arc<dyn LlmProvider>>,
}

impl FailoverChain {
    /// Build a chain from explicit providers (used by tests).
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn LlmProvider>>) -> Self {
        Self { providers }
    }

    /// Build one OpenRouter provider per pooled key, preserving pool order.
    #[must_use]
    pub fn from_pool(pool: &CredentialPool, config: OpenRouterConfig) -> Self {
        let providers = pool
            .keys()
            .iter()
            .map(|key| {
                Arc::new(OpenRouterProvider::new(key.clone(), config.clone()))
                    as Arc<dyn LlmProvider>
            })
            .collect();
        Self { providers }
    }

    /// Number of providers in the chain.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the chain has no providers.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Run the request through the chain.
    ///
    /// First success wins and short-circuits. HTTP-level failures (non-2xx,
    /// network) move on to the next key; any other error is returned as-is.
    /// When every key fails the last error is wrapped in
    /// [`Error::Exhausted`].
    pub async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        if self.providers.is_empty() {
            return Err(Error::NotConfigured(
                "no upstream API keys configured".to_string(),
            ));
        }

        let mut last: Option<Error> = None;
        for provider in &self.providers {
            match provider.complete(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() => {
                    warn!(provider = provider.name(), error = %e, "upstream attempt failed, trying next key");
                    last = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        let last = last.unwrap_or_else(|| {
            Error::NotConfigured("no upstream API keys configured".to_string())
        });
        Err(Error::Exhausted {
            attempts: self.providers.len(),
            last: Box::new(last),
        })
    }
}
