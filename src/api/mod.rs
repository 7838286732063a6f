//! Web API module
//!
//! REST endpoints:
//! - `POST /diagnose` - run the diagnosis pipeline
//! - `GET /history`, `GET /history/:id`, `DELETE /history/:id` - per-user
//!   diagnosis history
//! - `GET /health` - liveness probe
//! - `/docs` - Swagger UI

pub mod diagnose;
pub mod docs;
pub mod health;
pub mod history;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json, Router,
};
use pcdoctor_core::{AuthStore, HistoryStore};
use pcdoctor_llm::FailoverChain;
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

/// Create the application router with all endpoints and shared state.
pub fn router(
    auth: Arc<AuthStore>,
    store: Arc<HistoryStore>,
    chain: Arc<FailoverChain>,
) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(docs::routes())
        .merge(diagnose::routes())
        .merge(history::routes())
        .layer(Extension(auth))
        .layer(Extension(store))
        .layer(Extension(chain))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// API error taxonomy, rendered as `{"error": <message>}` JSON.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Client input failed validation (400)
    #[error("{0}")]
    Validation(&'static str),

    /// Operator misconfiguration, e.g. no upstream keys (500)
    #[error("{0}")]
    Configuration(&'static str),

    /// Every upstream credential failed (500)
    #[error("Failed to get diagnosis from AI service - all API keys exhausted")]
    UpstreamExhausted,

    /// Upstream succeeded but returned no content (500)
    #[error("No response from AI service")]
    EmptyUpstreamResponse,

    /// Requested record does not exist for this user (404)
    #[error("Not found")]
    NotFound,

    /// Anything else; detail is logged, never sent to the client (500)
    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Configuration(_)
            | ApiError::UpstreamExhausted
            | ApiError::EmptyUpstreamResponse
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(source) = &self {
            error!(error = %source, "internal error");
        }
        let body = json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

impl From<pcdoctor_llm::Error> for ApiError {
    fn from(err: pcdoctor_llm::Error) -> Self {
        match err {
            pcdoctor_llm::Error::NotConfigured(_) => {
                ApiError::Configuration("No OpenRouter API keys configured")
            }
            pcdoctor_llm::Error::Exhausted { attempts, last } => {
                error!(attempts, last_error = %last, "all upstream API keys failed");
                ApiError::UpstreamExhausted
            }
            other => ApiError::Internal(other.into()),
        }
    }
}

impl From<pcdoctor_core::Error> for ApiError {
    fn from(err: pcdoctor_core::Error) -> Self {
        ApiError::Internal(err.into())
    }
}
