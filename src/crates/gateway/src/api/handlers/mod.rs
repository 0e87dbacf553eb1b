//! API request handlers

pub mod auth;
pub mod health;
pub mod orchestrate;
pub mod runs;

pub use auth::{login, signup};
pub use health::{health, health_detailed};
pub use orchestrate::orchestrate;
pub use runs::{get_run, list_runs};
