//! Shared helpers for the arena gateway workspace
//!
//! # Modules
//!
//! - `env` - Environment variable loading with typed parsing
//! - `async_utils` - Timeouts and latency measurement for async calls
//! - `logging` - Duration formatting and secret redaction for log output

pub mod async_utils;
pub mod env;
pub mod logging;

use thiserror::Error;

/// Errors that can occur in the tooling crate
#[derive(Debug, Error)]
pub enum ToolingError {
    /// Environment variable present but unusable
    #[error("Invalid environment variable {key}: {message}")]
    InvalidEnv { key: String, message: String },
}

/// Result type for tooling operations
pub type Result<T> = std::result::Result<T, ToolingError>;

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_env_display() {
        let err = ToolingError::InvalidEnv {
            key: "PORT".to_string(),
            message: "not a number".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid environment variable PORT: not a number");
    }

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
