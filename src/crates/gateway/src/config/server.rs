//! Top-level gateway configuration
//!
//! Searches for the TOML file in:
//! 1. `CONFIG_PATH` environment variable
//! 2. `./config/gateway.toml`
//! 3. `./gateway.toml`
//!
//! and falls back to built-in defaults when none exists. Environment
//! variables (`HOST`, `PORT`, `DATABASE_URL`, `JWT_SECRET`, `TOKEN_TTL_SECS`,
//! `RANKING_STRATEGY`) override file values.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::providers::{default_providers, ProviderConfig};
use super::ConfigError;

/// Minimum accepted length of the token signing secret
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection string
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://gateway.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

/// Token settings
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl_secs(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

fn default_token_ttl_secs() -> u64 {
    3600
}

/// Orchestration defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationConfig {
    /// Temperature used when the request does not carry one
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Conversation turns rendered into the context block
    #[serde(default = "default_max_context_turns")]
    pub max_context_turns: usize,
    /// Model asked for a question when the request has none
    #[serde(default)]
    pub question_generator: Option<ProviderConfig>,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_context_turns: default_max_context_turns(),
            question_generator: None,
        }
    }
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_context_turns() -> usize {
    5
}

/// Ranking strategy selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingKind {
    /// Longer answers rank higher
    #[default]
    Length,
    /// A judge model orders the answers
    Judge,
}

impl FromStr for RankingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "length" => Ok(RankingKind::Length),
            "judge" => Ok(RankingKind::Judge),
            other => Err(format!("unknown ranking strategy '{}', expected length or judge", other)),
        }
    }
}

/// Ranking configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default)]
    pub strategy: RankingKind,
    /// Judge model, required when `strategy = "judge"`
    #[serde(default)]
    pub judge: Option<ProviderConfig>,
}

/// Complete gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: HttpConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    /// Competitors in declaration order
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,
    #[serde(default)]
    pub orchestration: OrchestrationConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: HttpConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            providers: default_providers(),
            orchestration: OrchestrationConfig::default(),
            ranking: RankingConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Locate and read the config file, or return defaults when there is none
    pub fn load_file() -> Result<Self, ConfigError> {
        if let Some(config_path) = tooling::env::var("CONFIG_PATH")? {
            tracing::info!(path = %config_path, "Loading configuration");
            return Self::from_file(config_path);
        }

        let paths = [
            PathBuf::from("config/gateway.toml"),
            PathBuf::from("./gateway.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!(path = %path.display(), "Loading configuration");
                return Self::from_file(path);
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Full startup path: file, environment overrides, validation
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_file()?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(host) = tooling::env::var("HOST")? {
            self.server.host = host;
        }
        if let Some(port) = tooling::env::var_parse::<u16>("PORT")? {
            self.server.port = port;
        }
        if let Some(url) = tooling::env::var("DATABASE_URL")? {
            self.database.url = url;
        }
        if let Some(secret) = tooling::env::var("JWT_SECRET")? {
            self.auth.jwt_secret = secret;
        }
        if let Some(ttl) = tooling::env::var_parse::<u64>("TOKEN_TTL_SECS")? {
            self.auth.token_ttl_secs = ttl;
        }
        if let Some(strategy) = tooling::env::var_parse::<RankingKind>("RANKING_STRATEGY")? {
            self.ranking.strategy = strategy;
        }
        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::invalid(format!(
                "JWT_SECRET must be at least {} characters",
                MIN_JWT_SECRET_LEN
            )));
        }
        if self.auth.token_ttl_secs == 0 {
            return Err(ConfigError::invalid("auth.token_ttl_secs must be greater than 0"));
        }
        if self.auth.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::invalid(format!(
                "auth.token_ttl_secs must be at most {} (one year)",
                MAX_TOKEN_TTL_SECS
            )));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::invalid("database.max_connections must be greater than 0"));
        }
        if self.providers.is_empty() {
            return Err(ConfigError::invalid("at least one provider must be configured"));
        }

        let mut seen = HashSet::new();
        for provider in &self.providers {
            provider.validate()?;
            if !seen.insert(provider.name.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "duplicate provider name: {}",
                    provider.name
                )));
            }
        }

        if !(0.0..=2.0).contains(&self.orchestration.temperature) {
            return Err(ConfigError::invalid("orchestration.temperature must be within 0.0..=2.0"));
        }
        if let Some(generator) = &self.orchestration.question_generator {
            generator.validate()?;
        }

        match (&self.ranking.strategy, &self.ranking.judge) {
            (RankingKind::Judge, None) => {
                return Err(ConfigError::invalid("ranking.judge is required when strategy = \"judge\""));
            }
            (_, Some(judge)) => judge.validate()?,
            _ => {}
        }

        Ok(())
    }

    /// `host:port` string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    const SECRET: &str = "test-secret-min-32-characters-long!!";

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:8000");
        assert_eq!(config.database.url, "sqlite://gateway.db?mode=rwc");
        assert_eq!(config.auth.token_ttl_secs, 3600);
        assert_eq!(config.providers.len(), 3);
        assert_eq!(config.orchestration.max_context_turns, 5);
        assert_eq!(config.ranking.strategy, RankingKind::Length);
    }

    #[test]
    fn test_default_requires_secret() {
        let mut config = GatewayConfig::default();
        assert!(config.validate().is_err());

        config.auth.jwt_secret = SECRET.to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parsing() {
        let toml_content = r#"
[server]
host = "0.0.0.0"
port = 9000

[database]
url = "sqlite::memory:"

[auth]
jwt_secret = "test-secret-min-32-characters-long!!"
token_ttl_secs = 600

[[providers]]
name = "mistral"
kind = "ollama"
base_url = "http://localhost:11434"
model = "mistral:latest"
timeout_secs = 30

[[providers]]
name = "gpt"
kind = "openai"
base_url = "https://api.openai.com/v1"
model = "gpt-4o-mini"
api_key_env = "OPENAI_API_KEY"
max_tokens = 800

[orchestration]
temperature = 0.2

[orchestration.question_generator]
name = "generator"
kind = "ollama"
base_url = "http://localhost:11434"
model = "llama3.2"

[ranking]
strategy = "judge"

[ranking.judge]
name = "judge"
kind = "ollama"
base_url = "http://localhost:11434"
model = "llama3.2"
"#;

        let config = GatewayConfig::from_toml(toml_content).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.auth.token_ttl_secs, 600);
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.providers[0].timeout_secs, 30);
        assert_eq!(config.providers[1].kind, ProviderKind::OpenAi);
        assert_eq!(config.providers[1].max_tokens, Some(800));
        assert_eq!(config.orchestration.max_context_turns, 5);
        assert!(config.orchestration.question_generator.is_some());
        assert_eq!(config.ranking.strategy, RankingKind::Judge);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duplicate_provider_names() {
        let mut config = GatewayConfig::default();
        config.auth.jwt_secret = SECRET.to_string();
        config.providers[1].name = config.providers[0].name.clone();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate provider name"));
    }

    #[test]
    fn test_judge_strategy_requires_judge() {
        let mut config = GatewayConfig::default();
        config.auth.jwt_secret = SECRET.to_string();
        config.ranking.strategy = RankingKind::Judge;
        assert!(config.validate().is_err());

        config.ranking.judge = Some(ProviderConfig::ollama("judge", "llama3.2"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_token_ttl_bounds() {
        let mut config = GatewayConfig::default();
        config.auth.jwt_secret = SECRET.to_string();

        config.auth.token_ttl_secs = MAX_TOKEN_TTL_SECS;
        assert!(config.validate().is_ok());

        config.auth.token_ttl_secs = MAX_TOKEN_TTL_SECS + 1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("token_ttl_secs"));

        config.auth.token_ttl_secs = 10_000_000_000_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_providers_rejected() {
        let mut config = GatewayConfig::default();
        config.auth.jwt_secret = SECRET.to_string();
        config.providers.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ranking_kind_from_str() {
        assert_eq!("Judge".parse::<RankingKind>().unwrap(), RankingKind::Judge);
        assert_eq!(" length ".parse::<RankingKind>().unwrap(), RankingKind::Length);
        assert!("vote".parse::<RankingKind>().is_err());
    }

    #[test]
    fn test_auth_debug_redacts_secret() {
        let auth = AuthConfig {
            jwt_secret: SECRET.to_string(),
            token_ttl_secs: 60,
        };
        assert!(!format!("{:?}", auth).contains(SECRET));
    }
}
