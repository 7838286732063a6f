//! Authentication module
//!
//! API-key authentication with constant-time comparison. Keys are loaded
//! from configuration at startup and held as SHA-256 digests; plaintext
//! keys never live longer than the config load.
//!
//! When authentication is disabled every request maps to an anonymous
//! user, which keeps the history store usable in single-user deployments.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credentials provided
    #[error("Authentication required")]
    MissingCredentials,

    /// Invalid API key
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Internal error
    #[error("auth internal error: {0}")]
    Internal(String),
}

/// How the caller authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// API key (Authorization: Bearer or X-API-Key header)
    ApiKey,
    /// Authentication disabled
    Anonymous,
}

/// Authenticated context attached to each request
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User identifier, used to scope history records
    pub user_id: String,
    /// How the user authenticated
    pub method: AuthMethod,
}

/// One configured API key bound to a user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyEntry {
    /// The plaintext key (config only; hashed on load)
    pub key: String,
    /// The user this key authenticates as
    pub user_id: String,
}

/// Validates API keys against a fixed set loaded at startup.
pub struct AuthStore {
    enabled: bool,
    keys: Vec<([u8; 32], String)>,
}

impl AuthStore {
    /// Build a store from configured key entries.
    pub fn new(enabled: bool, entries: &[ApiKeyEntry]) -> Self {
        let keys = entries
            .iter()
            .filter(|e| !e.key.trim().is_empty())
            .map(|e| (Self::hash(e.key.trim()), e.user_id.clone()))
            .collect();
        Self { enabled, keys }
    }

    /// A store that accepts every request as anonymous.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            keys: Vec::new(),
        }
    }

    /// Whether authentication is enforced.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn hash(key: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        hasher.finalize().into()
    }

    /// Validate the presented token, if any.
    ///
    /// With authentication disabled this always succeeds as the anonymous
    /// user. Comparison against the configured digests is constant-time.
    pub fn validate(&self, token: Option<&str>) -> Result<AuthContext, AuthError> {
        if !self.enabled {
            return Ok(AuthContext {
                user_id: "anonymous".to_string(),
                method: AuthMethod::Anonymous,
            });
        }

        let token = token.ok_or(AuthError::MissingCredentials)?;
        let presented = Self::hash(token.trim());

        let mut matched: Option<&str> = None;
        for (digest, user_id) in &self.keys {
            if presented.ct_eq(digest).into() {
                matched = Some(user_id);
            }
        }

        match matched {
            Some(user_id) => Ok(AuthContext {
                user_id: user_id.to_string(),
                method: AuthMethod::ApiKey,
            }),
            None => Err(AuthError::InvalidCredentials),
        }
    }
}
