//! Gateway server binary
//!
//! Loads configuration, migrates the database and serves the REST API
//! until Ctrl-C or SIGTERM.

use anyhow::Context;
use gateway::api::{create_router, AppState};
use gateway::config::GatewayConfig;
use gateway::db::DatabaseConnection;
use gateway::orchestration::OrchestrationEngine;
use gateway::services::{AuthService, JwtManager};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(version = gateway::version::VERSION, "Loading gateway configuration");
    let config = GatewayConfig::load().context("configuration is invalid")?;

    tracing::info!(
        providers = config.providers.len(),
        ranking = ?config.ranking.strategy,
        question_generator = config.orchestration.question_generator.is_some(),
        "Configuration loaded"
    );

    tracing::info!(url = %config.database.url, "Connecting to database");
    let db = DatabaseConnection::with_max_connections(&config.database.url, config.database.max_connections)
        .await
        .context("failed to open database")?;

    tracing::info!("Running database migrations");
    db.run_migrations().await.context("failed to run migrations")?;
    db.health_check().await.context("database health check failed")?;

    let jwt = JwtManager::from_config(&config.auth)?;
    let auth = AuthService::new(db.clone(), jwt);
    let engine = OrchestrationEngine::from_config(&config, db.clone())
        .context("failed to build provider clients")?;

    for provider in engine.providers() {
        tracing::info!(
            provider = provider.name(),
            model = provider.model_name(),
            timeout = ?provider.timeout(),
            "Provider registered"
        );
    }

    let app = create_router(AppState::new(db.clone(), auth, engine));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "Gateway listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("Gateway shut down gracefully");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl-C, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
