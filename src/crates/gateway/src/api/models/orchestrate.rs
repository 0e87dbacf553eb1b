//! Orchestration payloads

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::api::error::{ApiError, ApiResult};
use crate::db::models::{OrchestrationRun, ProviderResponse};
use crate::orchestration::{ConversationTurn, RunRequest};
use crate::session::SessionId;

pub const MAX_QUESTION_LEN: usize = 8_000;
pub const MAX_CONVERSATION_TURNS: usize = 100;

/// Body of `POST /orchestrate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrateRequest {
    pub session_id: String,
    /// Omit to let the configured generator pick a question
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub conversation: Vec<ConversationTurn>,
    #[serde(default)]
    pub num_competitors: Option<usize>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl OrchestrateRequest {
    /// Check shape and build the engine request for `user_id`
    pub fn into_run_request(self, user_id: impl Into<String>) -> ApiResult<RunRequest> {
        let session_id = SessionId::parse(self.session_id)?;

        if let Some(question) = &self.question {
            if question.chars().count() > MAX_QUESTION_LEN {
                return Err(ApiError::Validation(format!(
                    "question cannot exceed {} characters",
                    MAX_QUESTION_LEN
                )));
            }
        }
        if self.conversation.len() > MAX_CONVERSATION_TURNS {
            return Err(ApiError::Validation(format!(
                "conversation cannot exceed {} turns",
                MAX_CONVERSATION_TURNS
            )));
        }

        let request = RunRequest {
            user_id: user_id.into(),
            session_id,
            question: self.question,
            conversation: self.conversation,
            num_competitors: self.num_competitors,
            temperature: self.temperature,
        };
        request.validate()?;
        Ok(request)
    }
}

/// A run as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResponse {
    pub run_id: String,
    pub session_id: String,
    pub question: String,
    /// Provider declaration order
    pub responses: Vec<ProviderResponse>,
    /// Provider names, best first
    pub ranking: Vec<String>,
    pub latency_ms: u64,
    pub metadata: BTreeMap<String, String>,
    pub created_at: String,
}

impl From<OrchestrationRun> for RunResponse {
    fn from(run: OrchestrationRun) -> Self {
        Self {
            run_id: run.id,
            session_id: run.session_id,
            question: run.question,
            responses: run.responses,
            ranking: run.ranking,
            latency_ms: run.latency_ms,
            metadata: run.metadata,
            created_at: run.created_at,
        }
    }
}

impl RunResponse {
    /// The run as a conversation turn for follow-up requests
    pub fn to_turn(&self) -> ConversationTurn {
        ConversationTurn::new(&self.question)
            .with_answers(self.responses.iter().map(|r| r.text.clone()).collect())
            .with_ranking(self.ranking.clone())
    }
}
