//! Diagnosis endpoint
//!
//! POST /diagnose - run the full pipeline: validate input, build the
//! prompt, run the credential failover chain, normalize the model reply,
//! persist best-effort, return the diagnosis.

use axum::{routing::post, Extension, Json, Router};
use pcdoctor_core::{DiagnosisRequest, DiagnosisResult, HistoryStore};
use pcdoctor_llm::{build_prompt, normalize, system_prompt, CompletionRequest, FailoverChain, Message};
use std::sync::Arc;
use tracing::{error, info};

use super::ApiError;
use crate::middleware::auth::RequireAuth;

/// Run a diagnosis (requires authentication)
#[utoipa::path(
    post,
    path = "/diagnose",
    tag = "diagnose",
    responses(
        (status = 200, description = "Normalized diagnosis result"),
        (status = 400, description = "Missing or blank problem description"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "No credentials configured, all keys exhausted, or empty upstream reply")
    ),
    security(("api_key" = []))
)]
pub async fn diagnose(
    RequireAuth(auth): RequireAuth,
    Extension(chain): Extension<Arc<FailoverChain>>,
    Extension(store): Extension<Arc<HistoryStore>>,
    Json(request): Json<DiagnosisRequest>,
) -> Result<Json<DiagnosisResult>, ApiError> {
    let problem = request.problem.trim();
    if problem.is_empty() {
        return Err(ApiError::Validation("Problem description is required"));
    }

    let prompt = build_prompt(&request.system_specs, problem);
    let completion = CompletionRequest::new("")
        .with_message(Message::system(system_prompt()))
        .with_message(Message::user(prompt));

    let response = chain.complete(&completion).await?;
    if response.content.trim().is_empty() {
        return Err(ApiError::EmptyUpstreamResponse);
    }

    let result = normalize(&response.content);
    info!(
        user_id = %auth.user_id,
        confidence = result.confidence,
        steps = result.steps.len(),
        "diagnosis completed"
    );

    // Best-effort: a failed insert must not affect the prepared response
    if let Err(e) = store
        .insert(&auth.user_id, &request.system_specs, problem, &result)
        .await
    {
        error!(user_id = %auth.user_id, error = %e, "failed to persist diagnosis");
    }

    Ok(Json(result))
}

/// Create diagnosis routes
pub fn routes() -> Router {
    Router::new().route("/diagnose", post(diagnose))
}
