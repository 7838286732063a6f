//! History endpoints
//!
//! GET    /history     - list or search the caller's diagnosis history
//! GET    /history/:id - fetch one record
//! DELETE /history/:id - delete one record

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use pcdoctor_core::{history, HistoryStore, StoredDiagnosis};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

use super::ApiError;
use crate::middleware::auth::RequireAuth;

/// Query parameters for listing history
#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// Maximum number of results (clamped to 200)
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Optional search term matched against problem, diagnosis and specs
    pub q: Option<String>,
}

fn default_limit() -> i64 {
    history::DEFAULT_LIMIT
}

/// List or search the caller's history, newest first
#[utoipa::path(
    get,
    path = "/history",
    tag = "history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "History records, newest first"),
        (status = 401, description = "Unauthorized")
    ),
    security(("api_key" = []))
)]
pub async fn list_history(
    RequireAuth(auth): RequireAuth,
    Extension(store): Extension<Arc<HistoryStore>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<StoredDiagnosis>>, ApiError> {
    let records = match query.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => store.search(&auth.user_id, q, query.limit).await?,
        _ => store.list(&auth.user_id, query.limit).await?,
    };
    Ok(Json(records))
}

/// Fetch one history record
#[utoipa::path(
    get,
    path = "/history/{id}",
    tag = "history",
    params(("id" = Uuid, Path, description = "Record id")),
    responses(
        (status = 200, description = "The record"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such record for this user")
    ),
    security(("api_key" = []))
)]
pub async fn get_history(
    RequireAuth(auth): RequireAuth,
    Extension(store): Extension<Arc<HistoryStore>>,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredDiagnosis>, ApiError> {
    let record = store.get(&auth.user_id, id).await?;
    record.map(Json).ok_or(ApiError::NotFound)
}

/// Delete one history record
#[utoipa::path(
    delete,
    path = "/history/{id}",
    tag = "history",
    params(("id" = Uuid, Path, description = "Record id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such record for this user")
    ),
    security(("api_key" = []))
)]
pub async fn delete_history(
    RequireAuth(auth): RequireAuth,
    Extension(store): Extension<Arc<HistoryStore>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if store.delete(&auth.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// Create history routes
pub fn routes() -> Router {
    Router::new()
        .route("/history", get(list_history))
        .route("/history/:id", get(get_history).delete(delete_history))
}
