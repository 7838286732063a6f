//! Server configuration types
//!
//! Loaded from a TOML file with every section optional; environment
//! variables override the file for deployment-specific values. Upstream
//! API keys are never part of the file - they come exclusively from the
//! credential slot environment variables.

use anyhow::{Context, Result};
use pcdoctor_core::auth::ApiKeyEntry;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, used when no --config flag is given.
pub const DEFAULT_CONFIG_PATH: &str = "pcdoctor.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// History database settings
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Upstream LLM settings
    #[serde(default)]
    pub llm: LlmConfig,
    /// Authentication settings
    #[serde(default)]
    pub auth: AuthConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// History database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    "data/pcdoctor.db".to_string()
}

/// Upstream LLM settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Chat-completions base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Completion size cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Per-attempt request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Site URL sent as HTTP-Referer (env: PCDOCTOR_SITE_URL)
    #[serde(default = "default_site_url")]
    pub site_url: String,
    /// App name sent as X-Title
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            site_url: default_site_url(),
            app_name: default_app_name(),
        }
    }
}

fn default_model() -> String {
    pcdoctor_llm::openrouter::DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    pcdoctor_llm::openrouter::BASE_URL.to_string()
}

fn default_temperature() -> f32 {
    pcdoctor_llm::openrouter::DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    pcdoctor_llm::openrouter::DEFAULT_MAX_TOKENS
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_site_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_app_name() -> String {
    "PC Doctor".to_string()
}

/// Authentication settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Whether API-key authentication is enforced
    #[serde(default)]
    pub enabled: bool,
    /// Configured API keys and the users they authenticate as
    #[serde(default)]
    pub api_keys: Vec<ApiKeyEntry>,
}

impl AppConfig {
    /// Load configuration from the given path (or the default path when it
    /// exists), then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };

        if let Ok(bind) = std::env::var("PCDOCTOR_BIND") {
            config.server.bind = bind;
        }
        if let Ok(path) = std::env::var("PCDOCTOR_DATABASE") {
            config.database.path = path;
        }
        if let Ok(site_url) = std::env::var("PCDOCTOR_SITE_URL") {
            config.llm.site_url = site_url;
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.llm.model, "openai/gpt-4o-mini");
        assert_eq!(config.llm.timeout_secs, 60);
        assert!(!config.auth.enabled);
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            bind = "0.0.0.0:9000"

            [llm]
            model = "anthropic/claude-3-haiku"

            [auth]
            enabled = true
            api_keys = [{ key = "pcd-abc", user_id = "alice" }]
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.llm.model, "anthropic/claude-3-haiku");
        assert_eq!(config.llm.temperature, 0.7);
        assert!(config.auth.enabled);
        assert_eq!(config.auth.api_keys[0].user_id, "alice");
    }
}
