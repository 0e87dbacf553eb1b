//! Provider entries and construction of chat model clients

use llm::local::OllamaClient;
use llm::remote::OpenAiClient;
use llm::{ChatModel, LocalLlmConfig, RemoteLlmConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::ConfigError;

/// Wire protocol spoken by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Native Ollama `/api/chat`
    Ollama,
    /// OpenAI-compatible `/chat/completions`
    #[serde(alias = "openai-compatible")]
    OpenAi,
}

/// One configured provider (`[[providers]]`, question generator or judge)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Identifier used in responses, rankings and metadata
    pub name: String,
    pub kind: ProviderKind,
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key (OpenAI-compatible only)
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Deadline for a single call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Generated token cap forwarded to the provider
    #[serde(default = "default_max_tokens")]
    pub max_tokens: Option<usize>,
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_tokens() -> Option<usize> {
    Some(500)
}

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

impl ProviderConfig {
    /// Ollama provider with default timeout and token cap
    pub fn ollama(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ProviderKind::Ollama,
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: model.into(),
            api_key_env: None,
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether the base URL points at this machine
    pub fn is_local(&self) -> bool {
        let url = self.base_url.to_ascii_lowercase();
        ["://localhost", "://127.0.0.1", "://0.0.0.0", "://[::1]"]
            .iter()
            .any(|host| url.contains(host))
    }

    /// Check the entry for structural problems
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid("provider name cannot be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid(format!("provider {} has no model", self.name)));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::invalid(format!(
                "provider {} base_url must start with http:// or https://",
                self.name
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid(format!(
                "provider {} timeout_secs must be greater than 0",
                self.name
            )));
        }
        if self.kind == ProviderKind::OpenAi && self.api_key_env.is_none() && !self.is_local() {
            return Err(ConfigError::invalid(format!(
                "provider {} is remote and needs api_key_env",
                self.name
            )));
        }
        Ok(())
    }

    fn resolve_api_key(&self) -> Result<String, ConfigError> {
        match &self.api_key_env {
            Some(env_var) => tooling::env::var(env_var)?.ok_or_else(|| ConfigError::MissingApiKey {
                provider: self.name.clone(),
                env_var: env_var.clone(),
            }),
            None => Ok(String::new()),
        }
    }

    /// Construct the chat model client for this entry
    pub fn build(&self) -> Result<Arc<dyn ChatModel>, ConfigError> {
        let build_err = |e: llm::LlmError| ConfigError::ProviderBuild {
            provider: self.name.clone(),
            message: e.to_string(),
        };

        let model: Arc<dyn ChatModel> = match self.kind {
            ProviderKind::Ollama => {
                let config = LocalLlmConfig::new(&self.base_url, &self.model).with_timeout(self.timeout());
                Arc::new(OllamaClient::new(config).map_err(build_err)?)
            }
            ProviderKind::OpenAi => {
                let config = RemoteLlmConfig::new(self.resolve_api_key()?, &self.base_url, &self.model)
                    .with_timeout(self.timeout());
                Arc::new(OpenAiClient::new(config).map_err(build_err)?)
            }
        };

        tracing::debug!(provider = %self.name, model = %self.model, kind = ?self.kind, "Built provider client");
        Ok(model)
    }
}

/// Local Ollama competitors used when no `[[providers]]` are configured
pub fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::ollama("mistral", "mistral:latest"),
        ProviderConfig::ollama("gemma3", "gemma3:1b"),
        ProviderConfig::ollama("llama3.2", "llama3.2"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_providers() {
        let providers = default_providers();
        assert_eq!(providers.len(), 3);
        assert!(providers.iter().all(|p| p.kind == ProviderKind::Ollama && p.is_local()));
        assert_eq!(providers[1].model, "gemma3:1b");
        assert_eq!(providers[0].max_tokens, Some(500));
    }

    #[test]
    fn test_parse_entry_with_defaults() {
        let entry: ProviderConfig = toml::from_str(
            r#"
name = "gpt"
kind = "openai"
base_url = "https://api.openai.com/v1"
model = "gpt-4o-mini"
api_key_env = "OPENAI_API_KEY"
"#,
        )
        .unwrap();

        assert_eq!(entry.kind, ProviderKind::OpenAi);
        assert_eq!(entry.timeout_secs, 120);
        assert!(!entry.is_local());
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_remote_openai_requires_key_env() {
        let mut entry = ProviderConfig::ollama("gpt", "gpt-4o-mini");
        entry.kind = ProviderKind::OpenAi;
        entry.base_url = "https://api.openai.com/v1".to_string();
        assert!(entry.validate().is_err());

        entry.base_url = "http://localhost:11434/v1".to_string();
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_entries() {
        let mut entry = ProviderConfig::ollama("", "llama3.2");
        assert!(entry.validate().is_err());

        entry.name = "llama".to_string();
        entry.base_url = "localhost:11434".to_string();
        assert!(entry.validate().is_err());

        entry.base_url = DEFAULT_OLLAMA_URL.to_string();
        entry.timeout_secs = 0;
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_build_missing_api_key() {
        let mut entry = ProviderConfig::ollama("gpt", "gpt-4o-mini");
        entry.kind = ProviderKind::OpenAi;
        entry.base_url = "https://api.openai.com/v1".to_string();
        entry.api_key_env = Some("GATEWAY_TEST_MISSING_KEY_9912".to_string());

        match entry.build() {
            Err(ConfigError::MissingApiKey { env_var, .. }) => {
                assert_eq!(env_var, "GATEWAY_TEST_MISSING_KEY_9912")
            }
            other => panic!("expected MissingApiKey, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_build_ollama() {
        let model = ProviderConfig::ollama("llama", "llama3.2").build().unwrap();
        assert_eq!(model.model_name(), "llama3.2");
    }
}
