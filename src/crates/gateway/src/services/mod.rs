//! Domain services shared by the API handlers

pub mod auth;

pub use auth::{AuthService, Claims, IssuedToken, JwtManager, TOKEN_ISSUER};
