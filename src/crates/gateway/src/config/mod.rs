//! Gateway configuration
//!
//! Loaded once at startup from TOML plus environment overrides and passed
//! explicitly to the services that need it.

pub mod providers;
pub mod server;

use thiserror::Error;

pub use providers::{default_providers, ProviderConfig, ProviderKind};
pub use server::{
    AuthConfig, DatabaseConfig, GatewayConfig, HttpConfig, OrchestrationConfig, RankingConfig,
    RankingKind,
};

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid environment override: {0}")]
    EnvError(#[from] tooling::ToolingError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Missing API key for provider {provider}: set {env_var}")]
    MissingApiKey { provider: String, env_var: String },
    #[error("Failed to build provider {provider}: {message}")]
    ProviderBuild { provider: String, message: String },
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ConfigError::InvalidConfig(msg.into())
    }
}
