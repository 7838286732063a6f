//! PC Doctor LLM layer
//!
//! Everything between the HTTP handler and the upstream model:
//! - Credentials: ordered API-key pool from environment slots
//! - OpenRouter: chat-completion client, one attempt per call
//! - Failover: linear first-success-wins chain over per-key providers
//! - Prompt: deterministic diagnosis prompt templating
//! - Normalize: best-effort extraction of a `DiagnosisResult` from
//!   free-form model output, never failing

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod completion;
pub mod credentials;
pub mod error;
pub mod failover;
pub mod message;
pub mod mock;
pub mod normalize;
pub mod openrouter;
pub mod prompt;
pub mod provider;

pub use completion::{CompletionRequest, CompletionResponse, TokenUsage};
pub use credentials::{CredentialPool, KEY_SLOTS};
pub use error::{Error, Result};
pub use failover::FailoverChain;
pub use message::{Message, MessageRole};
pub use mock::MockProvider;
pub use normalize::{degraded_result, normalize};
pub use openrouter::{OpenRouterConfig, OpenRouterProvider};
pub use prompt::{build_prompt, system_prompt};
pub use provider::LlmProvider;
