//! API middleware layer
//!
//! CORS, request tracing, bearer authentication and body validation.

pub mod auth;
pub mod cors;
pub mod logging;
pub mod validation;

pub use auth::AuthUser;
pub use cors::cors_layer;
pub use logging::logging_layer;
pub use validation::{
    validate_not_empty, validate_password, validate_string_length, validate_username, JsonBody,
};
