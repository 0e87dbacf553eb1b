//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::api::{
    models::{DetailedHealthResponse, HealthResponse},
    response,
    routes::AppState,
};

/// GET /health
///
/// Liveness only; touches no dependency.
pub async fn health() -> impl axum::response::IntoResponse {
    response::ok(HealthResponse::new("ok"))
}

/// GET /health/detailed
///
/// Probes the database and every configured provider. 503 when the
/// database is unreachable; unreachable providers only degrade the status.
pub async fn health_detailed(
    State(app_state): State<AppState>,
) -> (StatusCode, Json<DetailedHealthResponse>) {
    let (database, providers) = tokio::join!(
        app_state.db.health_check(),
        app_state.engine.provider_status()
    );

    if let Err(e) = &database {
        tracing::error!(error = %e, "Database health check failed");
    }

    let health = DetailedHealthResponse::new(database.is_ok(), providers);
    let status = if database.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(health))
}
