//! Service configuration.
//!
//! Every option can come from the command line or the environment; `.env`
//! files are loaded before parsing.
//!
//! Environment:
//!   JWT_SECRET  - Token signing secret (required)
//!   PORT        - Listen port (default: 8050)
//!   HOST        - Listen address (default: 0.0.0.0)
//!   DB_PATH     - SQLite database file (default: database.db)
//!   BCRYPT_COST - Password hashing cost, 10..=31 (default: 10)

use crate::auth::password::{DEFAULT_WORK_FACTOR, MIN_WORK_FACTOR};
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;

/// Highest cost bcrypt accepts
const MAX_WORK_FACTOR: u32 = 31;

#[derive(Parser, Debug, Clone)]
#[command(name = "account-service")]
#[command(about = "User registration, login and profile API")]
pub struct Config {
    /// Secret used to sign and verify session tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true, default_value = "")]
    pub jwt_secret: String,

    /// Listen port
    #[arg(long, env = "PORT", default_value_t = 8050)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// SQLite database file
    #[arg(long, env = "DB_PATH", default_value = "database.db")]
    pub db_path: String,

    /// bcrypt cost factor
    #[arg(long, env = "BCRYPT_COST", default_value_t = DEFAULT_WORK_FACTOR)]
    pub bcrypt_cost: u32,
}

impl Config {
    /// Check values clap cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must be set to a non-empty value");
        }

        if !(MIN_WORK_FACTOR..=MAX_WORK_FACTOR).contains(&self.bcrypt_cost) {
            bail!(
                "BCRYPT_COST must be between {} and {}, got {}",
                MIN_WORK_FACTOR,
                MAX_WORK_FACTOR,
                self.bcrypt_cost
            );
        }

        self.listen_addr()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

/// Load `.env` from the working directory (and its parents), then next to the manifest
pub fn load_env() {
    let _ = dotenv::dotenv();

    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["account-service"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse(&[
            "--jwt-secret",
            "s3cret",
            "--port",
            "9000",
            "--db-path",
            "/tmp/users.db",
            "--bcrypt-cost",
            "12",
        ]);

        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.port, 9000);
        assert_eq!(config.db_path, "/tmp/users.db");
        assert_eq!(config.bcrypt_cost, 12);
        assert!(config.validate().is_ok());
        assert_eq!(config.listen_addr().unwrap().port(), 9000);
    }

    #[test]
    fn test_missing_secret_rejected() {
        let mut config = parse(&["--jwt-secret", "x"]);
        config.jwt_secret = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_weak_bcrypt_cost_rejected() {
        let config = parse(&["--jwt-secret", "x", "--bcrypt-cost", "4"]);
        assert!(config.validate().is_err());

        let config = parse(&["--jwt-secret", "x", "--bcrypt-cost", "32"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_host_rejected() {
        let config = parse(&["--jwt-secret", "x", "--host", "not an address"]);
        assert!(config.validate().is_err());
    }
}
