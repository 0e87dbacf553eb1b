//! Health check responses

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Liveness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            version: crate::version::VERSION.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Readiness response with dependency probes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// `ok`, `degraded` (some provider down) or `error` (database down)
    pub status: String,
    /// `connected` or `error`
    pub database: String,
    /// Provider name to reachability
    pub providers: BTreeMap<String, bool>,
    pub version: String,
    pub timestamp: String,
}

impl DetailedHealthResponse {
    pub fn new(database_ok: bool, providers: BTreeMap<String, bool>) -> Self {
        let status = if !database_ok {
            "error"
        } else if providers.values().all(|up| *up) {
            "ok"
        } else {
            "degraded"
        };

        Self {
            status: status.to_string(),
            database: if database_ok { "connected" } else { "error" }.to_string(),
            providers,
            version: crate::version::VERSION.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
