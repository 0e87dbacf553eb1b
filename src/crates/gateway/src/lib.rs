//! Session-aware LLM arena gateway
//!
//! Authenticates users, fans a question out to a configured set of chat
//! model providers, ranks the answers and persists every run scoped to the
//! caller and a client-supplied session id.
//!
//! Layers, leaves first:
//! - [`db`]: SQLite pool, user and run repositories
//! - [`services::auth`]: signup, login and token verification
//! - [`orchestration`]: provider fan-out, ranking and run assembly
//! - [`api`]: axum router mapping domain failures to HTTP statuses
//! - [`client`]: typed HTTP client used by the `gateway-cli` binary

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod orchestration;
pub mod services;
pub mod session;
pub mod version;

pub use error::{GatewayError, ProviderFailure, Result};
pub use session::SessionId;
