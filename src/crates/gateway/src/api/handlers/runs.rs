//! Run history handlers

use axum::extract::{rejection::QueryRejection, Path, Query, State};

use crate::api::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{RunListQuery, RunListResponse, RunResponse},
    response,
    routes::AppState,
};
use crate::db::repositories::RunRepository;
use crate::db::DatabaseError;

/// The caller's runs, newest first
///
/// GET /runs?session_id=&limit=
pub async fn list_runs(
    State(app_state): State<AppState>,
    user: AuthUser,
    query: Result<Query<RunListQuery>, QueryRejection>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let Query(query) = query?;
    let query = query.into_run_query(user.user_id)?;

    let runs = RunRepository::find_by(app_state.db.pool(), &query).await?;
    Ok(response::ok(RunListResponse {
        runs: runs.into_iter().map(RunResponse::from).collect(),
    }))
}

/// A single run owned by the caller
///
/// GET /runs/:id
pub async fn get_run(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let run = match RunRepository::find_one(app_state.db.pool(), &id).await {
        Ok(run) => run,
        Err(DatabaseError::NotFound(_)) => return Err(ApiError::NotFound(format!("run {}", id))),
        Err(e) => return Err(e.into()),
    };

    // another user's run is indistinguishable from a missing one
    if run.user_id != user.user_id {
        return Err(ApiError::NotFound(format!("run {}", id)));
    }

    Ok(response::ok(RunResponse::from(run)))
}
