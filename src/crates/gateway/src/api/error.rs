//! API error types and HTTP response conversion
//!
//! Maps gateway failures onto HTTP statuses and stable error codes.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::response::ErrorResponse;
use crate::db::DatabaseError;
use crate::error::{GatewayError, ProviderFailure};

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure returned by a handler
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body or a field outside its allowed range
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Missing, expired or tampered token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Username already taken: {0}")]
    DuplicateUser(String),

    /// Every provider failed; carries the rendered failure list
    #[error("{0}")]
    AllProvidersFailed(String),

    #[error("Storage failure")]
    Store(#[source] DatabaseError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DuplicateUser(_) => StatusCode::CONFLICT,
            ApiError::AllProvidersFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable code identifier
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::DuplicateUser(_) => "DUPLICATE_USER",
            ApiError::AllProvidersFailed(_) => "ALL_PROVIDERS_FAILED",
            ApiError::Store(_) => "STORE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Error kind name
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "ValidationError",
            ApiError::Unauthorized(_) => "Unauthorized",
            ApiError::InvalidCredentials => "InvalidCredentials",
            ApiError::NotFound(_) => "NotFound",
            ApiError::DuplicateUser(_) => "DuplicateUser",
            ApiError::AllProvidersFailed(_) => "AllProvidersFailed",
            ApiError::Store(_) => "StoreError",
            ApiError::Internal(_) => "InternalError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(self.error_type(), self.to_string(), self.code());

        if status.is_server_error() {
            match &self {
                ApiError::Store(e) => tracing::error!(code = %body.code, error = %e, "API error"),
                _ => tracing::error!(code = %body.code, message = %body.message, "API error"),
            }
        } else {
            tracing::warn!(code = %body.code, status = status.as_u16(), message = %body.message, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Validation(msg) => ApiError::Validation(msg),
            GatewayError::DuplicateUser(username) => ApiError::DuplicateUser(username),
            GatewayError::InvalidCredentials => ApiError::InvalidCredentials,
            GatewayError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            GatewayError::NotFound(what) => ApiError::NotFound(what),
            GatewayError::AllProvidersFailed(failures) => {
                ApiError::AllProvidersFailed(summarize_failures(&failures))
            }
            GatewayError::Store(db) => ApiError::Store(db),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Client-facing failure summary: provider names and outcome kind only.
/// Upstream error text can carry internal URLs and stays in the logs.
fn summarize_failures(failures: &[ProviderFailure]) -> String {
    let parts: Vec<String> = failures
        .iter()
        .map(|f| {
            let kind = if f.timed_out { "timed out" } else { "failed" };
            format!("{} ({})", f.provider, kind)
        })
        .collect();
    format!("All providers failed: {}", parts.join(", "))
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::Store(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
