//! Orchestration run model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

use crate::db::error::DatabaseError;
use crate::db::timestamp_now;

/// One provider's answer within a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Provider name as declared in configuration
    pub provider: String,
    /// Answer text
    pub text: String,
    /// Score assigned by the ranking strategy
    pub score: f64,
}

impl ProviderResponse {
    pub fn new(provider: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            text: text.into(),
            score: 0.0,
        }
    }
}

/// One persisted orchestration request/response cycle.
///
/// `responses` keeps provider declaration order; `ranking` lists the same
/// providers best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationRun {
    pub id: String,
    pub user_id: String,
    pub session_id: String,
    pub question: String,
    pub responses: Vec<ProviderResponse>,
    pub ranking: Vec<String>,
    /// Wall-clock duration of the whole run
    pub latency_ms: u64,
    pub created_at: String,
    pub metadata: BTreeMap<String, String>,
}

impl OrchestrationRun {
    /// Start a run record with a fresh id and the current timestamp
    pub fn new(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        question: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            session_id: session_id.into(),
            question: question.into(),
            responses: Vec::new(),
            ranking: Vec::new(),
            latency_ms: 0,
            created_at: timestamp_now(),
            metadata: BTreeMap::new(),
        }
    }

    /// Responses ordered by ranking, best first
    pub fn ranked_responses(&self) -> Vec<&ProviderResponse> {
        self.ranking
            .iter()
            .filter_map(|name| self.responses.iter().find(|r| &r.provider == name))
            .collect()
    }

    /// Provider ranked first
    pub fn winner(&self) -> Option<&str> {
        self.ranking.first().map(String::as_str)
    }
}

/// Row layout of `orchestration_runs`
#[derive(Debug, Clone, FromRow)]
pub struct RunRow {
    pub id: String,
    pub user_id: String,
    pub session_id: String,
    pub question: String,
    /// JSON array of [`ProviderResponse`]
    pub responses: String,
    /// JSON array of provider names
    pub ranking: String,
    pub latency_ms: i64,
    /// JSON object of string values
    pub metadata: String,
    pub created_at: String,
}

impl TryFrom<&OrchestrationRun> for RunRow {
    type Error = DatabaseError;

    fn try_from(run: &OrchestrationRun) -> Result<Self, Self::Error> {
        Ok(Self {
            id: run.id.clone(),
            user_id: run.user_id.clone(),
            session_id: run.session_id.clone(),
            question: run.question.clone(),
            responses: serde_json::to_string(&run.responses)?,
            ranking: serde_json::to_string(&run.ranking)?,
            latency_ms: i64::try_from(run.latency_ms)
                .map_err(|_| DatabaseError::type_error("latency_ms out of range"))?,
            metadata: serde_json::to_string(&run.metadata)?,
            created_at: run.created_at.clone(),
        })
    }
}

impl TryFrom<RunRow> for OrchestrationRun {
    type Error = DatabaseError;

    fn try_from(row: RunRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            session_id: row.session_id,
            question: row.question,
            responses: serde_json::from_str(&row.responses)?,
            ranking: serde_json::from_str(&row.ranking)?,
            latency_ms: u64::try_from(row.latency_ms)
                .map_err(|_| DatabaseError::type_error("negative latency_ms"))?,
            metadata: serde_json::from_str(&row.metadata)?,
            created_at: row.created_at,
        })
    }
}
