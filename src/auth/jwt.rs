//! JWT Token Handler
//! Mission: Issue one-hour session tokens and validate them back into claims

use crate::auth::models::{Claims, User};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// Session lifetime
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Returned for any token that must not be trusted: malformed, forged or expired
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid token")]
pub struct InvalidToken;

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(TOKEN_TTL_SECS),
        }
    }

    /// Generate a JWT token for a user, issued now
    pub fn issue(&self, user: &User) -> Result<String> {
        self.issue_at(user, Utc::now())
    }

    /// Generate a JWT token for a user as if issued at `now`
    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String> {
        let expiration = now
            .checked_add_signed(self.ttl)
            .context("Invalid timestamp")?;

        let claims = Claims {
            id: user.id,
            username: user.username.clone(),
            iat: now.timestamp().max(0) as usize,
            exp: expiration.timestamp().max(0) as usize,
        };

        debug!(
            "Generating JWT for user {} ({}), expires at {}",
            user.username, user.id, expiration
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to generate JWT")
    }

    /// Validate a JWT token and extract claims
    pub fn verify(&self, token: &str) -> Result<Claims, InvalidToken> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!("Rejected JWT: {}", e);
            InvalidToken
        })?;

        // The library only rejects `exp < now`; a token is dead at `exp` itself
        if decoded.claims.exp as i64 <= Utc::now().timestamp() {
            debug!("Rejected JWT: expired at {}", decoded.claims.exp);
            return Err(InvalidToken);
        }

        debug!("Validated JWT for user {}", decoded.claims.username);

        Ok(decoded.claims)
    }
}
