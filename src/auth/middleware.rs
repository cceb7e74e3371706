//! Authentication Middleware
//! Mission: Gate protected routes behind a valid bearer token

use crate::auth::{
    errors::{AccountError, INVALID_TOKEN, MISSING_TOKEN},
    jwt::JwtHandler,
    models::Claims,
};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Auth middleware that validates JWT tokens.
///
/// On success the verified [`Claims`] are placed in the request extensions.
pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AccountError> {
    let token = bearer_token(req.headers())?;

    let claims = jwt_handler
        .verify(token)
        .map_err(|_| AccountError::Unauthenticated(INVALID_TOKEN))?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Pull the token out of `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Result<&str, AccountError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(AccountError::Unauthenticated(MISSING_TOKEN));
    };

    let value = value
        .to_str()
        .map_err(|_| AccountError::Unauthenticated(INVALID_TOKEN))?;

    match value.strip_prefix("Bearer ").map(str::trim) {
        Some("") => Err(AccountError::Unauthenticated(MISSING_TOKEN)),
        Some(token) => Ok(token),
        None => Err(AccountError::Unauthenticated(INVALID_TOKEN)),
    }
}

/// Extract claims from request (use after auth middleware)
pub fn extract_claims(req: &Request) -> Option<&Claims> {
    req.extensions().get::<Claims>()
}
