//! API documentation - Swagger UI at /docs

use axum::Router;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::health::HealthResponse;

/// PC Doctor OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PC Doctor API",
        version = "0.1.0",
        description = "AI-assisted PC troubleshooting REST API.

## Overview
- **Diagnose**: submit system specs and a problem description, get a
  structured diagnosis with per-OS remediation steps
- **History**: browse, search and delete past diagnoses

## Authentication
When enabled, endpoints require an API key:
```
Authorization: Bearer <api_key>
```
",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        crate::api::diagnose::diagnose,
        crate::api::history::list_history,
        crate::api::history::get_history,
        crate::api::history::delete_history,
        crate::api::health::health_check,
    ),
    components(schemas(HealthResponse)),
    modifiers(&SecurityAddon),
    tags(
        (name = "diagnose", description = "Diagnosis pipeline"),
        (name = "history", description = "Per-user diagnosis history"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// Create documentation routes
pub fn routes() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api/openapi.json", ApiDoc::openapi()))
}
