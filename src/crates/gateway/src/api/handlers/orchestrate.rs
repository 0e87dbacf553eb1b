//! Orchestration handler

use axum::extract::State;

use crate::api::{
    error::ApiResult,
    middleware::{AuthUser, JsonBody},
    models::{OrchestrateRequest, RunResponse},
    response,
    routes::AppState,
};

/// Ask the configured providers and return the ranked run
///
/// POST /orchestrate
pub async fn orchestrate(
    State(app_state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<OrchestrateRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let request = req.into_run_request(user.user_id)?;
    let run = app_state.engine.execute(request).await?;

    tracing::info!(run_id = %run.id, session_id = %run.session_id, "Orchestration served");
    Ok(response::ok(RunResponse::from(run)))
}
