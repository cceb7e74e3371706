//! Authentication Module
//! Mission: Accounts with bcrypt-hashed passwords and one-hour JWT sessions

pub mod api;
pub mod errors;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod user_store;

pub use errors::AccountError;
pub use jwt::JwtHandler;
pub use middleware::auth_middleware;
pub use password::PasswordHasher;
pub use service::AccountService;
pub use user_store::{InMemoryUserStore, SqliteUserStore, UserStore};
