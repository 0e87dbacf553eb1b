//! Orchestration engine
//!
//! Fans one question out to the configured providers, ranks whatever came
//! back and persists the run. Persistence is the last step, so a request
//! that fails or is dropped midway leaves nothing behind.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use llm::{ChatRequest, Message};
use tooling::logging::{duration_ms, sanitize_for_logging};

use super::context::{recent_turns, render_context};
use super::prompts::{competitor_prompt, question_generation_request};
use super::provider::ProviderClient;
use super::ranking::{rank, JudgeStrategy, LengthStrategy, RankingError, RankingInput, RankingStrategy};
use super::RunRequest;
use crate::config::{ConfigError, GatewayConfig, RankingKind};
use crate::db::models::{OrchestrationRun, ProviderResponse};
use crate::db::repositories::RunRepository;
use crate::db::DatabaseConnection;
use crate::error::{GatewayError, ProviderFailure, Result};
use crate::session::SessionId;

/// Upper bound for `num_competitors`
pub const MAX_COMPETITORS: usize = 5;
/// Accepted range for a per-request temperature
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=1.5;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Run metadata keys
pub mod keys {
    pub const LATENCY_QUESTION: &str = "latency_ms.question_generation";
    pub const LATENCY_COMPETITORS: &str = "latency_ms.competitors";
    pub const LATENCY_RANKING: &str = "latency_ms.ranking";
    pub const LATENCY_TOTAL: &str = "latency_ms.total";
    pub const LATENCY_PROVIDER_PREFIX: &str = "latency_ms.provider.";
    pub const PROVIDER_ERROR_PREFIX: &str = "provider_error.";
    pub const RANKING_STRATEGY: &str = "ranking_strategy";
    pub const RANKING_FALLBACK: &str = "ranking_fallback";
    pub const JUDGE_MODEL: &str = "judge_model";
    pub const QUESTION_SOURCE: &str = "question_source";
    pub const CONTEXT_TURNS: &str = "context_turns";
    pub const TEMPERATURE: &str = "temperature";
}

/// Ranked, persisted multi-provider runs
pub struct OrchestrationEngine {
    db: DatabaseConnection,
    providers: Vec<ProviderClient>,
    question_generator: Option<ProviderClient>,
    strategy: Arc<dyn RankingStrategy>,
    temperature: f32,
    max_context_turns: usize,
}

impl OrchestrationEngine {
    /// Engine with length ranking, temperature 0.7 and five context turns
    pub fn new(db: DatabaseConnection, providers: Vec<ProviderClient>) -> Self {
        Self {
            db,
            providers,
            question_generator: None,
            strategy: Arc::new(LengthStrategy),
            temperature: 0.7,
            max_context_turns: 5,
        }
    }

    /// Build every client named in the configuration
    pub fn from_config(config: &GatewayConfig, db: DatabaseConnection) -> std::result::Result<Self, ConfigError> {
        let providers = config
            .providers
            .iter()
            .map(ProviderClient::from_config)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut engine = Self::new(db, providers)
            .with_temperature(config.orchestration.temperature)
            .with_max_context_turns(config.orchestration.max_context_turns);

        if let Some(generator) = &config.orchestration.question_generator {
            engine = engine.with_question_generator(ProviderClient::from_config(generator)?);
        }

        if config.ranking.strategy == RankingKind::Judge {
            let judge = config
                .ranking
                .judge
                .as_ref()
                .ok_or_else(|| ConfigError::invalid("ranking strategy 'judge' requires [ranking.judge]"))?;
            engine = engine.with_strategy(Arc::new(JudgeStrategy::new(ProviderClient::from_config(judge)?)));
        }

        Ok(engine)
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn RankingStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_question_generator(mut self, generator: ProviderClient) -> Self {
        self.question_generator = Some(generator);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_context_turns(mut self, turns: usize) -> Self {
        self.max_context_turns = turns;
        self
    }

    pub fn providers(&self) -> &[ProviderClient] {
        &self.providers
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Ask a single question in a session
    pub async fn run(
        &self,
        user_id: impl Into<String>,
        session_id: SessionId,
        question: impl Into<String>,
    ) -> Result<OrchestrationRun> {
        self.execute(RunRequest::new(user_id, session_id).with_question(question))
            .await
    }

    /// Execute a full run: question, fan-out, ranking, persistence
    #[instrument(skip(self, request), fields(user_id = %request.user_id, session_id = %request.session_id))]
    pub async fn execute(&self, request: RunRequest) -> Result<OrchestrationRun> {
        let started = Instant::now();
        request.validate()?;

        let temperature = request.temperature.unwrap_or(self.temperature);
        let count = request
            .num_competitors
            .unwrap_or(self.providers.len())
            .min(self.providers.len());
        let selected = &self.providers[..count];

        let mut metadata = BTreeMap::new();
        metadata.insert(keys::TEMPERATURE.to_string(), temperature.to_string());

        // question
        let phase = Instant::now();
        let question = self.resolve_question(&request, &mut metadata).await?;
        metadata.insert(keys::LATENCY_QUESTION.to_string(), duration_ms(phase.elapsed()).to_string());

        // context
        let turns_used = recent_turns(&request.conversation, self.max_context_turns).len();
        metadata.insert(keys::CONTEXT_TURNS.to_string(), turns_used.to_string());
        let context = render_context(&request.conversation, self.max_context_turns);

        // competitors
        let phase = Instant::now();
        let prompt = competitor_prompt(context.as_deref(), &question);
        let outcomes = join_all(selected.iter().map(|provider| {
            let request = ChatRequest::new(vec![Message::user(prompt.clone())]).with_temperature(temperature);
            provider.call(request)
        }))
        .await;
        metadata.insert(keys::LATENCY_COMPETITORS.to_string(), duration_ms(phase.elapsed()).to_string());

        let mut responses = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for outcome in outcomes {
            metadata.insert(
                format!("{}{}", keys::LATENCY_PROVIDER_PREFIX, outcome.provider),
                duration_ms(outcome.elapsed).to_string(),
            );
            match outcome.result {
                Ok(text) => {
                    debug!(provider = %outcome.provider, latency_ms = duration_ms(outcome.elapsed), "Provider answered");
                    responses.push(ProviderResponse::new(outcome.provider, text));
                }
                Err(failure) => {
                    warn!(
                        provider = %failure.provider,
                        timed_out = failure.timed_out,
                        error = %sanitize_for_logging(&failure.message),
                        "Provider failed"
                    );
                    metadata.insert(
                        format!("{}{}", keys::PROVIDER_ERROR_PREFIX, failure.provider),
                        failure.to_string(),
                    );
                    failures.push(failure);
                }
            }
        }

        if responses.is_empty() {
            warn!(providers = failures.len(), "All providers failed; run not persisted");
            return Err(GatewayError::AllProvidersFailed(failures));
        }

        // ranking
        let phase = Instant::now();
        let answers: Vec<&str> = responses.iter().map(|r| r.text.as_str()).collect();
        let input = RankingInput {
            question: &question,
            context: context.as_deref(),
            answers: &answers,
        };
        let scores = self.score(&input, &mut metadata).await;
        for (response, score) in responses.iter_mut().zip(scores) {
            response.score = score;
        }
        let ranking = rank(&responses);
        metadata.insert(keys::LATENCY_RANKING.to_string(), duration_ms(phase.elapsed()).to_string());

        let mut run = OrchestrationRun::new(request.user_id, request.session_id.as_str(), question);
        run.responses = responses;
        run.ranking = ranking;
        run.latency_ms = duration_ms(started.elapsed());
        metadata.insert(keys::LATENCY_TOTAL.to_string(), run.latency_ms.to_string());
        run.metadata = metadata;

        RunRepository::insert(self.db.pool(), &run).await?;

        info!(
            run_id = %run.id,
            latency_ms = run.latency_ms,
            responses = run.responses.len(),
            failed = failures.len(),
            winner = run.winner().unwrap_or_default(),
            "Run completed"
        );

        Ok(run)
    }

    async fn resolve_question(
        &self,
        request: &RunRequest,
        metadata: &mut BTreeMap<String, String>,
    ) -> Result<String> {
        if let Some(question) = request.question.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            metadata.insert(keys::QUESTION_SOURCE.to_string(), "client".to_string());
            return Ok(question.to_string());
        }

        let generator = self
            .question_generator
            .as_ref()
            .ok_or_else(|| GatewayError::validation("question is required"))?;

        let outcome = generator.call(question_generation_request()).await;
        let question = outcome
            .result
            .map_err(|failure| GatewayError::AllProvidersFailed(vec![failure]))?;

        info!(generator = %generator.name(), latency_ms = duration_ms(outcome.elapsed), "Generated question");
        metadata.insert(keys::QUESTION_SOURCE.to_string(), "generated".to_string());
        Ok(question)
    }

    /// Score with the configured strategy, falling back to length
    async fn score(&self, input: &RankingInput<'_>, metadata: &mut BTreeMap<String, String>) -> Vec<f64> {
        if let Some(model) = self.strategy.model_name() {
            metadata.insert(keys::JUDGE_MODEL.to_string(), model.to_string());
        }

        let result = self.strategy.score(input).await.and_then(|scores| {
            if scores.len() == input.answers.len() {
                Ok(scores)
            } else {
                Err(RankingError::ScoreCount {
                    expected: input.answers.len(),
                    got: scores.len(),
                })
            }
        });

        match result {
            Ok(scores) => {
                metadata.insert(keys::RANKING_STRATEGY.to_string(), self.strategy.name().to_string());
                scores
            }
            Err(e) => {
                warn!(strategy = %self.strategy.name(), error = %e, "Ranking failed, falling back to length");
                metadata.insert(keys::RANKING_STRATEGY.to_string(), LengthStrategy.name().to_string());
                metadata.insert(keys::RANKING_FALLBACK.to_string(), e.to_string());
                LengthStrategy::score_all(input.answers)
            }
        }
    }

    /// Reachability of every configured provider, keyed by name
    pub async fn provider_status(&self) -> BTreeMap<String, bool> {
        let checks = join_all(
            self.providers
                .iter()
                .map(|p| async move { (p.name().to_string(), p.is_available(PROBE_TIMEOUT).await) }),
        )
        .await;
        checks.into_iter().collect()
    }
}

impl std::fmt::Debug for OrchestrationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestrationEngine")
            .field("providers", &self.providers)
            .field("question_generator", &self.question_generator)
            .field("strategy", &self.strategy.name())
            .field("temperature", &self.temperature)
            .field("max_context_turns", &self.max_context_turns)
            .finish()
    }
}
