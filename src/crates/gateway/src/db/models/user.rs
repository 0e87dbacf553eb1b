//! User model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::timestamp_now;

/// A registered user. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier (UUID string)
    pub id: String,

    /// Login name, globally unique
    pub username: String,

    /// Argon2 PHC string; never serialized
    #[serde(skip_serializing, default)]
    pub password_digest: String,

    /// Creation timestamp (RFC 3339 string)
    pub created_at: String,
}

impl User {
    /// Create a new user with a fresh id and the current timestamp
    pub fn new(username: impl Into<String>, password_digest: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            password_digest: password_digest.into(),
            created_at: timestamp_now(),
        }
    }
}
