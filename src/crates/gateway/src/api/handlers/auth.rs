//! Signup and login handlers

use axum::extract::State;

use crate::api::{
    error::ApiResult,
    middleware::JsonBody,
    models::{LoginRequest, LoginResponse, SignupRequest, SignupResponse},
    response,
    routes::AppState,
};

/// Register a user
///
/// POST /signup
pub async fn signup(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<SignupRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    req.validate()?;

    let user = app_state.auth.signup(&req.username, &req.password).await?;
    Ok(response::created(SignupResponse::from(user)))
}

/// Exchange credentials for a bearer token
///
/// POST /login
pub async fn login(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    req.validate()?;

    let issued = app_state.auth.login(&req.username, &req.password).await?;
    Ok(response::ok(LoginResponse::from(issued)))
}
