//! Database models
//!
//! Timestamps are fixed-width RFC 3339 strings (TEXT in SQLite); structured
//! run fields are stored as JSON text.

pub mod run;
pub mod user;

pub use run::{OrchestrationRun, ProviderResponse, RunRow};
pub use user::User;
