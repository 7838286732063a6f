//! Error types for pcdoctor-llm

use thiserror::Error;

/// LLM error type
#[derive(Debug, Error)]
pub enum Error {
    /// No upstream credentials available
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Upstream returned a non-success status
    #[error("api error: {0}")]
    Api(String),

    /// Network-level failure reaching the upstream
    #[error("network error: {0}")]
    Network(String),

    /// 2xx response whose envelope could not be decoded
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Every configured key failed at the HTTP level
    #[error("all {attempts} api key(s) exhausted, last error: {last}")]
    Exhausted {
        /// Number of keys tried
        attempts: usize,
        /// The last attempt's error, kept for diagnostics
        last: Box<Error>,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the failover chain should move on to the next key.
    ///
    /// Only HTTP-level failures are retryable; errors decoding a 2xx body
    /// short-circuit the chain.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Api(_) | Error::Network(_))
    }
}
