//! Upstream credential pool
//!
//! Resolves the ordered list of OpenRouter API keys from a fixed set of
//! environment slots. The pool is read-only at request time; an empty pool
//! is valid here and surfaces as `Error::NotConfigured` when the failover
//! chain is asked to complete.

use secrecy::SecretString;
use std::fmt;

/// The fixed credential slots, in failover order.
pub const KEY_SLOTS: [&str; 3] = [
    "OPENROUTER_API_KEY",
    "OPENROUTER_API_KEY_2",
    "OPENROUTER_API_KEY_3",
];

/// Ordered pool of upstream API keys.
#[derive(Clone, Default)]
pub struct CredentialPool {
    keys: Vec<SecretString>,
}

impl fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPool")
            .field("keys", &self.keys.len())
            .finish()
    }
}

impl CredentialPool {
    /// Read the fixed slots from the environment, skipping absent or blank
    /// values. Order is slot declaration order.
    pub fn from_env() -> Self {
        let keys = KEY_SLOTS
            .iter()
            .filter_map(|slot| std::env::var(slot).ok())
            .filter_map(|value| {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(SecretString::from(trimmed.to_string()))
                }
            })
            .collect();
        Self { keys }
    }

    /// Build a pool from explicit keys, preserving order and skipping
    /// blank entries.
    pub fn from_keys(keys: impl IntoIterator<Item = String>) -> Self {
        let keys = keys
            .into_iter()
            .filter_map(|value| {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(SecretString::from(trimmed.to_string()))
                }
            })
            .collect();
        Self { keys }
    }

    /// The keys in failover order.
    pub fn keys(&self) -> &[SecretString] {
        &self.keys
    }

    /// Number of available keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys are configured.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
