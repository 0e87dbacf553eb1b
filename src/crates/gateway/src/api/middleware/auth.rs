//! Bearer token authentication
//!
//! Handlers that take an [`AuthUser`] argument only run for requests with a
//! valid `Authorization: Bearer <token>` header.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::api::error::ApiError;
use crate::api::routes::AppState;

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

/// Token from an `Authorization` header value, scheme matched case-insensitively
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?
            .to_str()
            .map_err(|_| ApiError::Unauthorized("malformed authorization header".to_string()))?;

        let token = bearer_token(header)
            .ok_or_else(|| ApiError::Unauthorized("expected a bearer token".to_string()))?;

        let user_id = state.auth.verify(token).await?;
        Ok(AuthUser { user_id })
    }
}
