//! Named chat model endpoints with their call budget

use std::sync::Arc;
use std::time::Duration;

use llm::{ChatModel, ChatRequest, LlmError};
use tooling::async_utils::{timed, with_timeout, TimeoutError};
use tooling::logging::format_duration;

use crate::config::{ConfigError, ProviderConfig};
use crate::error::ProviderFailure;

/// A configured model endpoint: display name, client and per-call timeout
#[derive(Clone)]
pub struct ProviderClient {
    name: String,
    model: Arc<dyn ChatModel>,
    timeout: Duration,
    max_tokens: Option<usize>,
}

/// Result of one provider call together with its wall-clock duration
#[derive(Debug, Clone)]
pub struct ProviderOutcome {
    pub provider: String,
    /// Trimmed answer text or the recorded failure
    pub result: Result<String, ProviderFailure>,
    pub elapsed: Duration,
}

impl ProviderClient {
    pub fn new(name: impl Into<String>, model: Arc<dyn ChatModel>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            model,
            timeout,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Build the HTTP client described by a provider entry
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ConfigError> {
        let client = Self::new(&config.name, config.build()?, config.timeout());
        Ok(match config.max_tokens {
            Some(max_tokens) => client.with_max_tokens(max_tokens),
            None => client,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe reachability; errors and timeouts count as unavailable
    pub async fn is_available(&self, probe_timeout: Duration) -> bool {
        matches!(
            with_timeout(probe_timeout, self.model.is_available()).await,
            Ok(true)
        )
    }

    /// Send a request under this provider's timeout.
    ///
    /// Never fails: errors, timeouts and blank answers become a
    /// [`ProviderFailure`] in the outcome.
    pub async fn call(&self, mut request: ChatRequest) -> ProviderOutcome {
        if request.max_tokens.is_none() {
            request.max_tokens = self.max_tokens;
        }

        let (result, elapsed) = timed(with_timeout(self.timeout, self.model.chat(request))).await;

        let result = match result {
            Ok(response) if response.text().is_empty() => {
                Err(ProviderFailure::new(&self.name, "empty response"))
            }
            Ok(response) => Ok(response.text().to_string()),
            Err(TimeoutError::Elapsed(limit)) => Err(ProviderFailure::timeout(
                &self.name,
                format!("no answer within {}", format_duration(limit)),
            )),
            Err(TimeoutError::Failed(LlmError::Timeout(msg))) => {
                Err(ProviderFailure::timeout(&self.name, msg))
            }
            Err(TimeoutError::Failed(e)) if e.is_auth_error() => {
                tracing::warn!(provider = %self.name, "Provider rejected credentials; check its API key");
                Err(ProviderFailure::new(&self.name, format!("credentials rejected: {}", e)))
            }
            Err(TimeoutError::Failed(e)) => Err(ProviderFailure::new(&self.name, e.to_string())),
        };

        ProviderOutcome {
            provider: self.name.clone(),
            result,
            elapsed,
        }
    }
}

impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient")
            .field("name", &self.name)
            .field("model", &self.model.model_name())
            .field("timeout", &self.timeout)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use llm::{ChatResponse, Message};

    struct Scripted {
        reply: std::result::Result<&'static str, &'static str>,
        delay: Duration,
    }

    #[async_trait]
    impl ChatModel for Scripted {
        async fn chat(&self, request: ChatRequest) -> llm::Result<ChatResponse> {
            tokio::time::sleep(self.delay).await;
            match self.reply {
                Ok(text) => Ok(ChatResponse::new(
                    format!("{} [{}]", text, request.max_tokens.unwrap_or(0)),
                    "scripted",
                )),
                Err(msg) => Err(LlmError::ProviderError(msg.to_string())),
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn client(reply: std::result::Result<&'static str, &'static str>, delay_ms: u64) -> ProviderClient {
        ProviderClient::new(
            "p",
            Arc::new(Scripted {
                reply,
                delay: Duration::from_millis(delay_ms),
            }),
            Duration::from_millis(100),
        )
    }

    fn request() -> ChatRequest {
        ChatRequest::new(vec![Message::user("q")])
    }

    #[tokio::test]
    async fn test_call_success_applies_max_tokens() {
        let outcome = client(Ok("  answer "), 0).with_max_tokens(500).call(request()).await;
        assert_eq!(outcome.provider, "p");
        assert_eq!(outcome.result.unwrap(), "answer  [500]");
    }

    #[tokio::test]
    async fn test_call_error_is_recorded() {
        let outcome = client(Err("boom"), 0).call(request()).await;
        let failure = outcome.result.unwrap_err();
        assert!(!failure.timed_out);
        assert!(failure.message.contains("boom"));
    }

    struct Unauthorized;

    #[async_trait]
    impl ChatModel for Unauthorized {
        async fn chat(&self, _request: ChatRequest) -> llm::Result<ChatResponse> {
            Err(LlmError::AuthenticationError("invalid api key".to_string()))
        }

        fn model_name(&self) -> &str {
            "locked"
        }
    }

    #[tokio::test]
    async fn test_call_auth_error_is_flagged() {
        let client = ProviderClient::new("gpt", Arc::new(Unauthorized), Duration::from_millis(100));
        let failure = client.call(request()).await.result.unwrap_err();

        assert!(!failure.timed_out);
        assert!(failure.message.starts_with("credentials rejected:"));
        assert!(failure.message.contains("invalid api key"));
    }

    #[tokio::test]
    async fn test_call_timeout_is_recorded() {
        let outcome = client(Ok("late"), 1_000).call(request()).await;
        let failure = outcome.result.unwrap_err();
        assert!(failure.timed_out);
        assert!(outcome.elapsed < Duration::from_millis(900));
    }

    #[tokio::test]
    async fn test_is_available_defaults_true() {
        assert!(client(Ok("x"), 0).is_available(Duration::from_secs(1)).await);
    }
}
