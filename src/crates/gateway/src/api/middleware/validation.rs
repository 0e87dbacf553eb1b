//! Request validation utilities
//!
//! Field checks used by the request models plus a JSON extractor whose
//! rejections come back as `VALIDATION_ERROR` instead of plain text.

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::api::error::{ApiError, ApiResult};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 64;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 256;

/// Validate that a required string field is not blank
pub fn validate_not_empty(value: &str, field_name: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{} cannot be empty", field_name)));
    }
    Ok(())
}

/// Validate length in characters
pub fn validate_string_length(value: &str, field_name: &str, min: usize, max: usize) -> ApiResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ApiError::Validation(format!(
            "{} must be between {} and {} characters",
            field_name, min, max
        )));
    }
    Ok(())
}

/// 3-64 characters of letters, digits and `._@-`
pub fn validate_username(username: &str) -> ApiResult<()> {
    validate_string_length(username, "username", USERNAME_MIN_LEN, USERNAME_MAX_LEN)?;
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '@' | '-'))
    {
        return Err(ApiError::Validation(
            "username may only contain letters, digits and . _ @ -".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> ApiResult<()> {
    validate_string_length(password, "password", PASSWORD_MIN_LEN, PASSWORD_MAX_LEN)
}

/// `Json<T>` with rejections mapped to [`ApiError::Validation`]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("hello", "name").is_ok());
        assert!(validate_not_empty("   ", "name").is_err());
    }

    #[test]
    fn test_validate_string_length_counts_chars() {
        assert!(validate_string_length("héllo", "name", 5, 5).is_ok());
        assert!(validate_string_length("hi", "name", 3, 10).is_err());
        assert!(validate_string_length("very long string", "name", 1, 5).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a.b_c@d-e").is_ok());
        assert!(validate_username("al").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password1").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(257)).is_err());
    }
}
