//! Orchestration run repository (run store)

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::{OrchestrationRun, RunRow};

/// Filter for [`RunRepository::find_by`]
#[derive(Debug, Clone)]
pub struct RunQuery {
    /// Owner of the runs
    pub user_id: String,
    /// Restrict to one session
    pub session_id: Option<String>,
    /// Maximum number of runs
    pub limit: Option<u32>,
}

impl RunQuery {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: None,
            limit: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Run repository; runs are written once and never updated
pub struct RunRepository;

impl RunRepository {
    /// Persist a run and return its id
    pub async fn insert(pool: &DatabasePool, run: &OrchestrationRun) -> DbResult<String> {
        let row = RunRow::try_from(run)?;

        sqlx::query(
            "INSERT INTO orchestration_runs
                (id, user_id, session_id, question, responses, ranking, latency_ms, metadata, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.user_id)
        .bind(&row.session_id)
        .bind(&row.question)
        .bind(&row.responses)
        .bind(&row.ranking)
        .bind(row.latency_ms)
        .bind(&row.metadata)
        .bind(&row.created_at)
        .execute(pool)
        .await?;

        Ok(row.id)
    }

    /// Runs of a user, optionally scoped to a session, newest first
    pub async fn find_by(pool: &DatabasePool, query: &RunQuery) -> DbResult<Vec<OrchestrationRun>> {
        let limit = query.limit.map(i64::from).unwrap_or(-1);
        let rows = sqlx::query_as::<_, RunRow>(
            "SELECT * FROM orchestration_runs
             WHERE user_id = ?1 AND (?2 IS NULL OR session_id = ?2)
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?3",
        )
        .bind(&query.user_id)
        .bind(query.session_id.as_deref())
        .bind(limit)
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(OrchestrationRun::try_from).collect()
    }

    /// Get a run by id
    pub async fn find_one(pool: &DatabasePool, id: &str) -> DbResult<OrchestrationRun> {
        let row = sqlx::query_as::<_, RunRow>("SELECT * FROM orchestration_runs WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found(format!("run {}", id)))?;

        OrchestrationRun::try_from(row)
    }
}
