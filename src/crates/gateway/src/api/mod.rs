//! HTTP API layer
//!
//! - Signup and login
//! - Authenticated orchestration and run history
//! - Health checks
//!
//! Every domain failure is converted into an [`ApiError`] with a stable
//! status code and `code` string.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use middleware::{cors_layer, logging_layer, AuthUser};
pub use response::ErrorResponse;
pub use routes::{create_router, AppState};
