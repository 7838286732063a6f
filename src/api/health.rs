//! Health check endpoint

use axum::{response::Json, routing::get, Router};
use serde::Serialize;

/// Simple health response
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// Always "healthy" when the process is serving
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// Liveness probe (unauthenticated)
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Create health routes
pub fn routes() -> Router {
    Router::new().route("/health", get(health_check))
}
