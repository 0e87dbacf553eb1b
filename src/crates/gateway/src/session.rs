//! Client-supplied session identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GatewayError, Result};

/// Maximum length of a session id
pub const MAX_SESSION_ID_LEN: usize = 128;

fn is_session_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':' | '-')
}

/// Opaque correlation key grouping runs of one conversation.
///
/// Sessions are not persisted; the id is only attached to runs and used as a
/// filter when reading them back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Validate and wrap a raw session id
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() || raw.len() > MAX_SESSION_ID_LEN {
            return Err(GatewayError::validation(format!(
                "session_id must be between 1 and {} characters",
                MAX_SESSION_ID_LEN
            )));
        }
        if !raw.chars().all(is_session_char) {
            return Err(GatewayError::validation(
                "session_id may only contain letters, digits, '.', '_', ':' and '-'",
            ));
        }
        Ok(Self(raw))
    }

    /// Fresh random session id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SessionId {
    type Error = GatewayError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
