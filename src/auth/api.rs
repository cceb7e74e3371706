//! Account API Endpoints
//! Mission: Registration, login and profile endpoints

use crate::auth::{
    errors::{AccountError, MISSING_TOKEN},
    middleware::extract_claims,
    models::{LoginRequest, LoginResponse, MessageResponse, ProfileResponse, RegisterRequest},
    service::AccountService,
};
use axum::{
    extract::{rejection::JsonRejection, Request, State},
    Json,
};
use tracing::info;

/// Register endpoint - POST /newuser
pub async fn register(
    State(service): State<AccountService>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AccountError> {
    let Json(payload) = payload?;
    info!("Registration attempt: {}", payload.username);

    let id = service.register(payload).await?;

    Ok(Json(MessageResponse::new(format!(
        "Created new user with id {}",
        id
    ))))
}

/// Login endpoint - POST /login
pub async fn login(
    State(service): State<AccountService>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AccountError> {
    let Json(payload) = payload?;
    info!("Login attempt: {}", payload.username);

    let jwt_token = service.login(&payload.username, &payload.password).await?;

    Ok(Json(LoginResponse {
        jwt_token,
        message: "Logged In".to_string(),
    }))
}

/// Current user's profile - GET /user (behind auth middleware)
pub async fn get_current_user(
    State(service): State<AccountService>,
    req: Request,
) -> Result<Json<ProfileResponse>, AccountError> {
    let claims = extract_claims(&req)
        .cloned()
        .ok_or(AccountError::Unauthenticated(MISSING_TOKEN))?;

    let profile = service.profile(&claims).await?;

    Ok(Json(profile))
}

/// Liveness check - GET /
pub async fn root() -> &'static str {
    "User API running"
}
