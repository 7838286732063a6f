//! Authentication middleware for axum
//!
//! Extracts Bearer tokens or API keys from requests and validates them
//! against the `AuthStore`. Provides the `RequireAuth` extractor for
//! handlers.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use pcdoctor_core::auth::{AuthContext, AuthError, AuthStore};
use serde_json::json;
use std::sync::Arc;

/// Auth rejection carrying the status and a `{"error": ...}` body.
pub struct AuthRejection {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<AuthError> for AuthRejection {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => AuthRejection {
                status: StatusCode::UNAUTHORIZED,
                message:
                    "Authentication required. Provide Authorization: Bearer <key> or X-API-Key."
                        .to_string(),
            },
            AuthError::InvalidCredentials => AuthRejection {
                status: StatusCode::UNAUTHORIZED,
                message: "Invalid API key".to_string(),
            },
            AuthError::Internal(msg) => AuthRejection {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: msg,
            },
        }
    }
}

/// Axum extractor that requires authentication.
///
/// Reads the token from `Authorization: Bearer <key>` or `X-API-Key`.
/// With authentication disabled the request proceeds as the anonymous
/// user.
pub struct RequireAuth(pub AuthContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let auth_store = parts
            .extensions
            .get::<Arc<AuthStore>>()
            .ok_or_else(|| AuthError::Internal("AuthStore not configured".to_string()))?;

        let token = extract_token(parts);
        let ctx = auth_store.validate(token.as_deref())?;
        Ok(RequireAuth(ctx))
    }
}

/// Extract the token from request headers.
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(auth_header) = parts.headers.get("authorization") {
        if let Ok(value) = auth_header.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }

    if let Some(api_key_header) = parts.headers.get("x-api-key") {
        if let Ok(value) = api_key_header.to_str() {
            return Some(value.trim().to_string());
        }
    }

    None
}
