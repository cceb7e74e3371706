//! Account Service
//! Mission: Registration, login and profile decisions on top of the store, hasher and JWT handler

use crate::auth::{
    errors::AccountError,
    jwt::JwtHandler,
    models::{Claims, NewUser, ProfileResponse, RegisterRequest},
    password::{PasswordHasher, MAX_PASSWORD_BYTES},
    user_store::{StoreError, UserStore},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a request needs; cheap to clone into each handler
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    jwt: Arc<JwtHandler>,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, jwt: Arc<JwtHandler>) -> Self {
        Self { store, hasher, jwt }
    }

    pub fn jwt(&self) -> Arc<JwtHandler> {
        self.jwt.clone()
    }

    /// Create an account and return its id
    pub async fn register(&self, req: RegisterRequest) -> Result<i64, AccountError> {
        if req.username.is_empty() {
            return Err(AccountError::InvalidInput("Username is required"));
        }
        if req.password.is_empty() {
            return Err(AccountError::InvalidInput("Password is required"));
        }
        if req.password.len() > MAX_PASSWORD_BYTES {
            return Err(AccountError::InvalidInput(
                "Password must be at most 72 bytes",
            ));
        }

        let lookup = req.username.clone();
        if self.with_store(move |s| s.find_by_username(&lookup)).await?.is_some() {
            warn!("Registration rejected, username taken: {}", req.username);
            return Err(AccountError::DuplicateUser);
        }

        let password_hash = self.hasher.hash(&req.password).await?;
        let username = req.username.clone();
        let new_user = NewUser {
            username: req.username,
            password_hash,
            phone_num: req.phone_no,
            address: req.address,
        };

        // A concurrent registration may have claimed the name since the check above
        let id = match self.with_store(move |s| s.insert(&new_user)).await {
            Ok(id) => id,
            Err(StoreError::Duplicate) => {
                warn!("Registration lost race for username: {}", username);
                return Err(AccountError::DuplicateUser);
            }
            Err(e) => return Err(e.into()),
        };

        info!("Created user: {} ({})", username, id);
        Ok(id)
    }

    /// Check credentials and mint a session token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AccountError> {
        let lookup = username.to_string();
        let Some(user) = self.with_store(move |s| s.find_by_username(&lookup)).await? else {
            // Unknown users cost as much bcrypt work as a wrong password
            self.hasher.verify_absent(password).await;
            warn!("Failed login attempt, unknown user: {}", username);
            return Err(AccountError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash).await {
            warn!("Failed login attempt: {}", username);
            return Err(AccountError::InvalidCredentials);
        }

        let token = self
            .jwt
            .issue(&user)
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        info!("Login successful: {} ({})", user.username, user.id);
        Ok(token)
    }

    /// Profile of the token's subject
    pub async fn profile(&self, claims: &Claims) -> Result<ProfileResponse, AccountError> {
        let id = claims.id;
        let user = self
            .with_store(move |s| s.find_by_id(id))
            .await?
            .ok_or_else(|| {
                warn!("Token subject {} ({}) no longer exists", claims.username, id);
                AccountError::NotFound
            })?;

        Ok(ProfileResponse::from_user(&user))
    }

    /// Run a store call on the blocking pool
    async fn with_store<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn UserStore) -> Result<T, StoreError> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| StoreError::Backend(format!("Task join error: {}", e)))?
    }
}
