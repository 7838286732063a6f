//! Server bootstrap
//!
//! Wires configuration into the concrete pipeline: history store, auth
//! store, credential pool, per-key providers, failover chain, router.

pub mod config;

use crate::api;
use anyhow::{Context, Result};
use pcdoctor_core::{AuthStore, HistoryStore};
use pcdoctor_llm::{CredentialPool, FailoverChain, OpenRouterConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use config::AppConfig;

/// Build the failover chain from the environment credential slots.
fn build_chain(config: &AppConfig) -> FailoverChain {
    let pool = CredentialPool::from_env();
    if pool.is_empty() {
        warn!(
            "no OpenRouter API keys configured ({:?}); /diagnose will fail until one is set",
            pcdoctor_llm::KEY_SLOTS
        );
    } else {
        info!(keys = pool.len(), "credential pool loaded");
    }

    let or_config = OpenRouterConfig::default()
        .with_base_url(config.llm.base_url.clone())
        .with_model(config.llm.model.clone())
        .with_timeout(Duration::from_secs(config.llm.timeout_secs))
        .with_site_url(config.llm.site_url.clone());
    let or_config = OpenRouterConfig {
        temperature: config.llm.temperature,
        max_tokens: config.llm.max_tokens,
        app_name: Some(config.llm.app_name.clone()),
        ..or_config
    };

    FailoverChain::from_pool(&pool, or_config)
}

/// Run the server until shutdown.
pub async fn run(config: AppConfig) -> Result<()> {
    let store = HistoryStore::new(&config.database.path)
        .await
        .context("failed to open history database")?;
    let auth = AuthStore::new(config.auth.enabled, &config.auth.api_keys);
    if !config.auth.enabled {
        warn!("authentication disabled; all requests run as the anonymous user");
    }

    let chain = build_chain(&config);

    let app = api::router(Arc::new(auth), Arc::new(store), Arc::new(chain));

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    info!("listening on http://{}", config.server.bind);

    axum::serve(listener, app).await.context("server error")
}
