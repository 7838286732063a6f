//! OpenRouter chat-completions client
//!
//! One provider instance wraps one API key. Failover across keys is the
//! job of [`crate::failover::FailoverChain`]; this client performs a
//! single POST per call with an explicit request timeout.

use crate::completion::{CompletionRequest, CompletionResponse, TokenUsage};
use crate::error::{Error, Result};
use crate::message::Message;
use crate::provider::LlmProvider;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// OpenRouter API base URL
pub const BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Default per-attempt request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default completion size cap
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Sanitize API error messages before they reach logs or clients
fn sanitize_api_error(error: &str) -> String {
    let lower = error.to_lowercase();

    if lower.contains("api key")
        || lower.contains("apikey")
        || lower.contains("invalid key")
        || lower.contains("unauthorized")
        || lower.contains("authentication")
    {
        return "API authentication error. Please check your API key configuration.".to_string();
    }

    if lower.contains("rate limit") || lower.contains("quota") {
        return "API rate limit exceeded. Please try again later.".to_string();
    }

    if error.len() < 100 {
        return error.to_string();
    }

    "An API error occurred. Please try again.".to_string()
}

/// Mask an API key for safe display
fn mask_api_key(key: &str) -> String {
    if key.len() <= 8 {
        return "****".to_string();
    }
    format!("{}...{}", &key[..4], &key[key.len() - 4..])
}

/// OpenRouter provider configuration (key excluded; one key per provider)
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// Base URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion size cap
    pub max_tokens: u32,
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// App name sent as `X-Title`
    pub app_name: Option<String>,
    /// Site URL sent as `HTTP-Referer`
    pub site_url: Option<String>,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
            app_name: Some("PC Doctor".to_string()),
            site_url: None,
        }
    }
}

impl OpenRouterConfig {
    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the site URL
    #[must_use]
    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = Some(url.into());
        self
    }
}

// ============================================================================
// API types (OpenAI compatible)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenRouterRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<OpenRouterChoice>,
    usage: Option<OpenRouterUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterChoice {
    message: WireMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenRouterError {
    error: OpenRouterErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenRouterErrorDetail {
    message: String,
}

// ============================================================================
// Provider implementation
// ============================================================================

/// OpenRouter LLM provider bound to a single API key.
pub struct OpenRouterProvider {
    client: Client,
    config: OpenRouterConfig,
    api_key: SecretString,
    label: String,
}

impl fmt::Debug for OpenRouterProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterProvider")
            .field("label", &self.label)
            .field("config", &self.config)
            .finish()
    }
}

impl OpenRouterProvider {
    /// Create a provider for one API key.
    #[must_use]
    pub fn new(api_key: SecretString, config: OpenRouterConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");
        let label = format!("openrouter[{}]", mask_api_key(api_key.expose_secret()));

        Self {
            client,
            config,
            api_key,
            label,
        }
    }

    fn convert_message(msg: &Message) -> WireMessage {
        WireMessage {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        &self.label
    }

    #[instrument(skip(self, request), fields(provider = %self.label))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let model = if request.model.is_empty() {
            self.config.model.clone()
        } else {
            request.model.clone()
        };

        let body = OpenRouterRequest {
            model,
            messages: request.messages.iter().map(Self::convert_message).collect(),
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            temperature: request.temperature.unwrap_or(self.config.temperature),
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let mut http_request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .header("Content-Type", "application/json");

        if let Some(app_name) = &self.config.app_name {
            http_request = http_request.header("X-Title", app_name);
        }
        if let Some(site_url) = &self.config.site_url {
            http_request = http_request.header("HTTP-Referer", site_url);
        }

        debug!("sending request to OpenRouter");

        let response = http_request
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<OpenRouterError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(Error::Api(sanitize_api_error(&message)));
        }

        let response: OpenRouterResponse =
            serde_json::from_str(&text).map_err(|e| Error::InvalidResponse(e.to_string()))?;

        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        // An empty choices list maps to empty content; the caller decides
        // whether that is an error
        let (content, finish_reason) = response
            .choices
            .into_iter()
            .next()
            .map(|c| (c.message.content, c.finish_reason))
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            usage,
            finish_reason,
            model: response.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = OpenRouterConfig::default()
            .with_model("openai/gpt-4o")
            .with_timeout(Duration::from_secs(30))
            .with_site_url("https://pcdoctor.example");

        assert_eq!(config.model, "openai/gpt-4o");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.site_url.as_deref(), Some("https://pcdoctor.example"));
        assert_eq!(config.app_name.as_deref(), Some("PC Doctor"));
    }

    #[test]
    fn test_api_key_masking() {
        let masked = mask_api_key("sk-or-1234567890abcdefghij");
        assert!(masked.starts_with("sk-o"));
        assert!(masked.ends_with("ghij"));
        assert_eq!(mask_api_key("short"), "****");
    }

    #[test]
    fn test_provider_label_masks_key() {
        let provider = OpenRouterProvider::new(
            SecretString::from("sk-or-1234567890abcdefghij".to_string()),
            OpenRouterConfig::default(),
        );
        assert!(provider.name().starts_with("openrouter["));
        assert!(!provider.name().contains("1234567890"));
    }

    #[test]
    fn test_sanitize_api_error() {
        assert!(sanitize_api_error("Invalid API key provided").contains("authentication"));
        assert!(sanitize_api_error("Rate limit exceeded for requests").contains("rate limit"));
        assert_eq!(sanitize_api_error("model not found"), "model not found");
        let long = "x".repeat(200);
        assert_eq!(
            sanitize_api_error(&long),
            "An API error occurred. Please try again."
        );
    }

    #[test]
    fn test_response_parsing_tolerates_missing_fields() {
        let parsed: OpenRouterResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(parsed.choices.is_empty());
        assert!(parsed.usage.is_none());

        let parsed: OpenRouterResponse = serde_json::from_str(
            r#"{"model":"openai/gpt-4o-mini","choices":[{"message":{"role":"assistant","content":"{}"},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.choices[0].message.content, "{}");
    }
}
