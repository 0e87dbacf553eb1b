//! API route definitions

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{handlers, middleware};
use crate::db::DatabaseConnection;
use crate::orchestration::OrchestrationEngine;
use crate::services::AuthService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService>,
    pub engine: Arc<OrchestrationEngine>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, auth: AuthService, engine: OrchestrationEngine) -> Self {
        Self {
            db,
            auth: Arc::new(auth),
            engine: Arc::new(engine),
        }
    }
}

/// Build the complete API router
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health))
        .route("/health/detailed", get(handlers::health_detailed))
        // Auth
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        // Orchestration
        .route("/orchestrate", post(handlers::orchestrate))
        .route("/runs", get(handlers::list_runs))
        .route("/runs/:id", get(handlers::get_run))
        .layer(middleware::logging_layer())
        .layer(middleware::cors_layer())
        .with_state(app_state)
}
