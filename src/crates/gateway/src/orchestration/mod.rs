//! Multi-provider orchestration
//!
//! - [`context`]: renders recent conversation turns into prompt context
//! - [`prompts`]: competitor, judge and question-generation prompts
//! - [`provider`]: a named model client with its own timeout
//! - [`ranking`]: pluggable scoring with a stable tie-break
//! - [`engine`]: fan-out, ranking and persistence of a run

pub mod context;
pub mod engine;
pub mod prompts;
pub mod provider;
pub mod ranking;

pub use context::ConversationTurn;
pub use engine::{OrchestrationEngine, MAX_COMPETITORS, TEMPERATURE_RANGE};
pub use provider::{ProviderClient, ProviderOutcome};
pub use ranking::{JudgeStrategy, LengthStrategy, RankingError, RankingInput, RankingStrategy};

use crate::error::{GatewayError, Result};
use crate::session::SessionId;

/// Everything the engine needs for one run
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub user_id: String,
    pub session_id: SessionId,
    /// Absent or blank means "generate one"
    pub question: Option<String>,
    /// Prior turns, oldest first
    pub conversation: Vec<ConversationTurn>,
    /// Use only the first N configured providers
    pub num_competitors: Option<usize>,
    pub temperature: Option<f32>,
}

impl RunRequest {
    pub fn new(user_id: impl Into<String>, session_id: SessionId) -> Self {
        Self {
            user_id: user_id.into(),
            session_id,
            question: None,
            conversation: Vec::new(),
            num_competitors: None,
            temperature: None,
        }
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    pub fn with_conversation(mut self, conversation: Vec<ConversationTurn>) -> Self {
        self.conversation = conversation;
        self
    }

    pub fn with_num_competitors(mut self, n: usize) -> Self {
        self.num_competitors = Some(n);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Check the per-request knobs
    pub fn validate(&self) -> Result<()> {
        if let Some(n) = self.num_competitors {
            if !(1..=MAX_COMPETITORS).contains(&n) {
                return Err(GatewayError::validation(format!(
                    "num_competitors must be between 1 and {}",
                    MAX_COMPETITORS
                )));
            }
        }
        if let Some(t) = self.temperature {
            if !TEMPERATURE_RANGE.contains(&t) {
                return Err(GatewayError::validation(format!(
                    "temperature must be between {} and {}",
                    TEMPERATURE_RANGE.start(),
                    TEMPERATURE_RANGE.end()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RunRequest {
        RunRequest::new("user-1", SessionId::parse("s1").unwrap())
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(request().validate().is_ok());
        assert!(request().with_num_competitors(5).with_temperature(1.5).validate().is_ok());
    }

    #[test]
    fn test_num_competitors_bounds() {
        assert!(request().with_num_competitors(0).validate().is_err());
        assert!(request().with_num_competitors(6).validate().is_err());
    }

    #[test]
    fn test_temperature_bounds() {
        assert!(request().with_temperature(-0.1).validate().is_err());
        assert!(request().with_temperature(1.6).validate().is_err());
        assert!(request().with_temperature(f32::NAN).validate().is_err());
    }
}
