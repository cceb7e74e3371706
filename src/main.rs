//! Account Service
//! Mission: Register users, log them in with a password, and serve their own profile

use account_service::{
    api::create_router,
    auth::{AccountService, JwtHandler, PasswordHasher, SqliteUserStore},
    config::{load_env, Config},
};
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    let config = Config::parse();
    config.validate()?;

    // The store must be open before any traffic is served
    let store = SqliteUserStore::new(&config.db_path)
        .with_context(|| format!("Failed to open user database at {}", config.db_path))?;

    let service = AccountService::new(
        Arc::new(store),
        PasswordHasher::new(config.bcrypt_cost),
        Arc::new(JwtHandler::new(&config.jwt_secret)),
    );

    let app = create_router(service);

    let addr = config.listen_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
