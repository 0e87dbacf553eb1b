//! Run history payloads

use serde::{Deserialize, Serialize};

use super::orchestrate::RunResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::db::repositories::RunQuery;
use crate::session::SessionId;

pub const DEFAULT_RUN_LIMIT: u32 = 50;
pub const MAX_RUN_LIMIT: u32 = 500;

/// Query string of `GET /runs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunListQuery {
    pub session_id: Option<String>,
    pub limit: Option<u32>,
}

impl RunListQuery {
    /// Store query scoped to `user_id`
    pub fn into_run_query(self, user_id: impl Into<String>) -> ApiResult<RunQuery> {
        let limit = self.limit.unwrap_or(DEFAULT_RUN_LIMIT);
        if limit == 0 || limit > MAX_RUN_LIMIT {
            return Err(ApiError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_RUN_LIMIT
            )));
        }

        let mut query = RunQuery::for_user(user_id).with_limit(limit);
        if let Some(session_id) = self.session_id {
            query = query.with_session(SessionId::parse(session_id)?.as_str());
        }
        Ok(query)
    }
}

/// Body of `GET /runs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunListResponse {
    /// Newest first
    pub runs: Vec<RunResponse>,
}
