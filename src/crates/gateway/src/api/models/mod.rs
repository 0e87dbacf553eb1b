//! API data transfer objects

pub mod auth;
pub mod health;
pub mod orchestrate;
pub mod runs;

pub use auth::{LoginRequest, LoginResponse, SignupRequest, SignupResponse};
pub use health::{DetailedHealthResponse, HealthResponse};
pub use orchestrate::{OrchestrateRequest, RunResponse};
pub use runs::{RunListQuery, RunListResponse};
