//! Domain error taxonomy for the gateway
//!
//! Every layer below the API returns [`GatewayError`]; the API layer turns it
//! into a status code and a stable error code string.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;
use crate::db::DatabaseError;

/// Outcome of a provider call that did not produce an answer.
///
/// Recorded in run metadata, never raised on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFailure {
    /// Provider name as declared in configuration
    pub provider: String,
    /// Error text
    pub message: String,
    /// Whether the call hit its deadline
    pub timed_out: bool,
}

impl ProviderFailure {
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timed_out: true,
            ..Self::new(provider, message)
        }
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.timed_out {
            write!(f, "{}: timeout ({})", self.provider, self.message)
        } else {
            write!(f, "{}: {}", self.provider, self.message)
        }
    }
}

/// Errors produced by gateway services
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request payload or parameter failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Signup with a username that is already taken
    #[error("Username already exists: {0}")]
    DuplicateUser(String),

    /// Unknown username or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Missing, malformed, expired or tampered token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource does not exist or is not visible to the caller
    #[error("Not found: {0}")]
    NotFound(String),

    /// No provider produced an answer
    #[error("All providers failed: {}", join_failures(.0))]
    AllProvidersFailed(Vec<ProviderFailure>),

    /// Persistence failure
    #[error("Store error: {0}")]
    Store(#[from] DatabaseError),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_failures(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl GatewayError {
    pub fn validation(msg: impl Into<String>) -> Self {
        GatewayError::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        GatewayError::Unauthorized(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        GatewayError::Internal(msg.into())
    }
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
