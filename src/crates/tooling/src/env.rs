//! Environment variable loading
//!
//! Blank values are treated the same as unset ones so that `FOO=` in a
//! container manifest does not silently override a configured default.

use crate::{Result, ToolingError};
use std::str::FromStr;

/// Read an environment variable.
///
/// Returns `Ok(None)` when the variable is unset or blank and an error when it
/// is not valid UTF-8.
pub fn var(key: &str) -> Result<Option<String>> {
    match std::env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(ToolingError::InvalidEnv {
            key: key.to_string(),
            message: "value is not valid UTF-8".to_string(),
        }),
    }
}

/// Read and parse an environment variable.
///
/// # Example
///
/// ```rust,ignore
/// let port: Option<u16> = tooling::env::var_parse("PORT")?;
/// ```
pub fn var_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(key)? {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ToolingError::InvalidEnv {
                key: key.to_string(),
                message: e.to_string(),
            }),
        None => Ok(None),
    }
}

/// Read an environment variable, falling back to `default` when unset.
pub fn var_or(key: &str, default: impl Into<String>) -> Result<String> {
    Ok(var(key)?.unwrap_or_else(|| default.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_missing() {
        assert!(var("TOOLING_TEST_ENV_MISSING_7781").unwrap().is_none());
    }

    #[test]
    fn test_var_blank_is_unset() {
        std::env::set_var("TOOLING_TEST_ENV_BLANK", "   ");
        assert!(var("TOOLING_TEST_ENV_BLANK").unwrap().is_none());
        std::env::remove_var("TOOLING_TEST_ENV_BLANK");
    }

    #[test]
    fn test_var_parse() {
        std::env::set_var("TOOLING_TEST_ENV_PORT", " 8123 ");
        let port: Option<u16> = var_parse("TOOLING_TEST_ENV_PORT").unwrap();
        assert_eq!(port, Some(8123));
        std::env::remove_var("TOOLING_TEST_ENV_PORT");
    }

    #[test]
    fn test_var_parse_invalid() {
        std::env::set_var("TOOLING_TEST_ENV_BAD_PORT", "eighty");
        let result: Result<Option<u16>> = var_parse("TOOLING_TEST_ENV_BAD_PORT");
        match result {
            Err(ToolingError::InvalidEnv { key, .. }) => assert_eq!(key, "TOOLING_TEST_ENV_BAD_PORT"),
            other => panic!("expected InvalidEnv, got {:?}", other),
        }
        std::env::remove_var("TOOLING_TEST_ENV_BAD_PORT");
    }

    #[test]
    fn test_var_or() {
        let value = var_or("TOOLING_TEST_ENV_MISSING_7782", "fallback").unwrap();
        assert_eq!(value, "fallback");
    }
}
