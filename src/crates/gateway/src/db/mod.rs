//! Database module for the gateway
//!
//! Provides the SQLite pool, models, repositories and error handling for
//! users and orchestration runs.

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;

pub use connection::{DatabaseConnection, DatabasePool};
pub use error::{DatabaseError, DbResult};

/// Current UTC time as a fixed-width RFC 3339 string.
///
/// Fixed width keeps lexicographic order equal to chronological order, which
/// the `ORDER BY created_at` queries rely on.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
