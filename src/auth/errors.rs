//! Account Errors
//! Mission: One taxonomy for every way an account request can fail

use crate::auth::models::MessageResponse;
use crate::auth::user_store::StoreError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

/// Errors surfaced by the account flows
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("User already exists")]
    DuplicateUser,
    #[error("Invalid username or password")]
    InvalidCredentials,
    /// Missing, malformed, forged or expired bearer token
    #[error("{0}")]
    Unauthenticated(&'static str),
    #[error("User not found")]
    NotFound,
    #[error("Unable to process password")]
    Encoding(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("internal error: {0}")]
    Internal(String),
}

pub const MISSING_TOKEN: &str = "No token, authorization denied";
pub const INVALID_TOKEN: &str = "Token is not valid";

impl AccountError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_)
            | Self::DuplicateUser
            | Self::InvalidCredentials
            | Self::Encoding(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Unreadable or incomplete JSON bodies are plain bad input
impl From<JsonRejection> for AccountError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        AccountError::InvalidInput("Invalid request body")
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::Store(e) => {
                error!("Account store failure: {}", e);
                "Internal server error".to_string()
            }
            Self::Internal(e) => {
                error!("Account request failed: {}", e);
                "Internal server error".to_string()
            }
            Self::Encoding(e) => {
                error!("Password hashing failed: {}", e);
                self.to_string()
            }
            other => other.to_string(),
        };

        (status, Json(MessageResponse::new(message))).into_response()
    }
}
