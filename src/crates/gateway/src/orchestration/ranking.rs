//! Pluggable ranking of competitor answers
//!
//! A [`RankingStrategy`] assigns one score per answer. [`rank`] then orders
//! providers by score, best first, keeping declaration order on ties.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use llm::LlmError;
use tooling::logging::{sanitize_for_logging, truncate_for_logging};

use super::prompts::{judge_prompt, judge_request};
use super::provider::ProviderClient;
use crate::db::models::ProviderResponse;

/// Why a strategy could not score a set of answers
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("judge call failed: {0}")]
    Judge(String),
    #[error("judge output is not a ranking: {0}")]
    Unparseable(String),
    #[error("strategy returned {got} scores for {expected} answers")]
    ScoreCount { expected: usize, got: usize },
}

impl From<LlmError> for RankingError {
    fn from(err: LlmError) -> Self {
        RankingError::Judge(err.to_string())
    }
}

/// What a strategy gets to look at
#[derive(Debug, Clone, Copy)]
pub struct RankingInput<'a> {
    pub question: &'a str,
    pub context: Option<&'a str>,
    /// Successful answers in provider declaration order
    pub answers: &'a [&'a str],
}

/// Scores answers; higher is better
#[async_trait]
pub trait RankingStrategy: Send + Sync {
    /// Short identifier recorded in run metadata
    fn name(&self) -> &str;

    /// Model consulted while ranking, if any
    fn model_name(&self) -> Option<&str> {
        None
    }

    /// One score per answer, same order as `input.answers`
    async fn score(&self, input: &RankingInput<'_>) -> Result<Vec<f64>, RankingError>;
}

/// Longer answers rank higher
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthStrategy;

impl LengthStrategy {
    /// Non-whitespace characters of the trimmed answer
    pub fn score_answer(answer: &str) -> f64 {
        answer.trim().chars().filter(|c| !c.is_whitespace()).count() as f64
    }

    pub fn score_all(answers: &[&str]) -> Vec<f64> {
        answers.iter().map(|a| Self::score_answer(a)).collect()
    }
}

#[async_trait]
impl RankingStrategy for LengthStrategy {
    fn name(&self) -> &str {
        "length"
    }

    async fn score(&self, input: &RankingInput<'_>) -> Result<Vec<f64>, RankingError> {
        Ok(Self::score_all(input.answers))
    }
}

/// A judge model orders the numbered answers
#[derive(Debug, Clone)]
pub struct JudgeStrategy {
    judge: ProviderClient,
}

#[derive(Debug, Deserialize)]
struct JudgeVerdict {
    results: Vec<serde_json::Value>,
}

impl JudgeStrategy {
    pub fn new(judge: ProviderClient) -> Self {
        Self { judge }
    }

    /// Extract 0-based answer indices, best first, from raw judge output.
    ///
    /// Reads the span between the first `{` and the last `}`. Numbers outside
    /// `1..=answer_count` and repeats are skipped. Returns `None` when nothing
    /// usable remains.
    pub fn parse_verdict(raw: &str, answer_count: usize) -> Option<Vec<usize>> {
        let start = raw.find('{')?;
        let end = raw.rfind('}')?;
        if end < start {
            return None;
        }

        let verdict: JudgeVerdict = serde_json::from_str(&raw[start..=end]).ok()?;

        let mut order = Vec::with_capacity(answer_count);
        for value in verdict.results {
            let number = match &value {
                serde_json::Value::Number(n) => n.as_u64(),
                serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
                _ => None,
            };
            let Some(number) = number.and_then(|n| usize::try_from(n).ok()) else {
                continue;
            };
            if (1..=answer_count).contains(&number) && !order.contains(&(number - 1)) {
                order.push(number - 1);
            }
        }

        (!order.is_empty()).then_some(order)
    }

    /// Listed answers score `n, n-1, ...` in verdict order; unlisted score 0
    pub fn scores_from_order(order: &[usize], answer_count: usize) -> Vec<f64> {
        let mut scores = vec![0.0; answer_count];
        for (position, &idx) in order.iter().enumerate() {
            scores[idx] = (answer_count - position) as f64;
        }
        scores
    }
}

#[async_trait]
impl RankingStrategy for JudgeStrategy {
    fn name(&self) -> &str {
        "judge"
    }

    fn model_name(&self) -> Option<&str> {
        Some(self.judge.model_name())
    }

    async fn score(&self, input: &RankingInput<'_>) -> Result<Vec<f64>, RankingError> {
        let prompt = judge_prompt(input.context, input.question, input.answers);
        let outcome = self.judge.call(judge_request(prompt)).await;
        let raw = outcome
            .result
            .map_err(|failure| RankingError::Judge(failure.to_string()))?;

        debug!(
            judge = %self.judge.name(),
            raw = %truncate_for_logging(&sanitize_for_logging(&raw), 500),
            "Judge verdict"
        );

        let order = Self::parse_verdict(&raw, input.answers.len())
            .ok_or_else(|| RankingError::Unparseable(truncate_for_logging(&raw, 200)))?;

        Ok(Self::scores_from_order(&order, input.answers.len()))
    }
}

/// Order provider names by score descending; ties keep declaration order
pub fn rank(responses: &[ProviderResponse]) -> Vec<String> {
    let mut order: Vec<&ProviderResponse> = responses.iter().collect();
    // stable: equal scores stay in declaration order
    order.sort_by(|a, b| b.score.total_cmp(&a.score));
    order.into_iter().map(|r| r.provider.clone()).collect()
}
