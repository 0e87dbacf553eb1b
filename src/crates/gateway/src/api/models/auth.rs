//! Signup and login payloads

use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::api::middleware::validation::{validate_not_empty, validate_password, validate_username};
use crate::db::models::User;
use crate::services::IssuedToken;

/// Request to register a user
#[derive(Clone, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_username(&self.username)?;
        validate_password(&self.password)
    }
}

/// Request for a token
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.username, "username")?;
        validate_not_empty(&self.password, "password")
    }
}

macro_rules! redacted_debug {
    ($name:ident) => {
        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("username", &self.username)
                    .field("password", &"[REDACTED]")
                    .finish()
            }
        }
    };
}

redacted_debug!(SignupRequest);
redacted_debug!(LoginRequest);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub user_id: String,
    pub username: String,
    pub created_at: String,
}

impl From<User> for SignupResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Always `bearer`
    pub token_type: String,
    /// RFC 3339 expiry
    pub expires_at: String,
}

impl From<IssuedToken> for LoginResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            token_type: "bearer".to_string(),
            expires_at: issued.expires_at.to_rfc3339(),
        }
    }
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
