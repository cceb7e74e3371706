//! Password Hashing
//! Mission: Turn plaintext passwords into salted bcrypt hashes and check them back

use crate::auth::errors::AccountError;
use std::sync::{Arc, OnceLock};
use tracing::warn;

/// Lowest bcrypt cost accepted from configuration
pub const MIN_WORK_FACTOR: u32 = 10;

/// Cost used when none is configured
pub const DEFAULT_WORK_FACTOR: u32 = 10;

/// bcrypt reads at most this many bytes of a password
pub const MAX_PASSWORD_BYTES: usize = 72;

/// bcrypt hasher with a fixed cost factor
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    // Hash of a throwaway secret at `cost`, checked when no stored hash exists
    decoy_hash: Arc<OnceLock<String>>,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            decoy_hash: Arc::new(OnceLock::new()),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh random salt.
    ///
    /// Runs on the blocking thread pool; bcrypt is deliberately slow.
    /// Passwords longer than [`MAX_PASSWORD_BYTES`] are refused rather than truncated.
    pub async fn hash(&self, plaintext: &str) -> Result<String, AccountError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(AccountError::Encoding(format!(
                "password exceeds {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }

        let plaintext = plaintext.to_string();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || {
            bcrypt::hash(plaintext, cost).map_err(|e| AccountError::Encoding(e.to_string()))
        })
        .await
        .map_err(|e| AccountError::Encoding(format!("Task join error: {}", e)))?
    }

    /// Check a password against a stored hash.
    ///
    /// Salt and cost come from `stored_hash` itself. A stored hash bcrypt cannot
    /// parse counts as a mismatch, as does a password bcrypt would truncate.
    pub async fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return false;
        }

        let plaintext = plaintext.to_string();
        let stored_hash = stored_hash.to_string();

        let outcome =
            tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &stored_hash)).await;

        match outcome {
            Ok(Ok(matched)) => matched,
            Ok(Err(e)) => {
                warn!("Stored password hash could not be checked: {}", e);
                false
            }
            Err(e) => {
                warn!("Password verification task failed: {}", e);
                false
            }
        }
    }

    /// Spend the same bcrypt work as [`verify`](Self::verify) when there is no
    /// account to check against. Always `false`.
    pub async fn verify_absent(&self, plaintext: &str) -> bool {
        let plaintext = plaintext.to_string();
        let cost = self.cost;
        let decoy = self.decoy_hash.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            let hash = decoy.get_or_init(|| {
                bcrypt::hash("decoy-password-never-issued", cost).unwrap_or_else(|e| {
                    warn!("Could not build decoy hash at cost {}: {}", cost, e);
                    String::new()
                })
            });
            let _ = bcrypt::verify(plaintext, hash);
        })
        .await;

        if let Err(e) = outcome {
            warn!("Password verification task failed: {}", e);
        }
        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_WORK_FACTOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt's minimum cost keeps the tests quick
    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("pw1").await.unwrap();

        assert_ne!(hash, "pw1");
        assert!(hasher.verify("pw1", &hash).await);
        assert!(!hasher.verify("pw2", &hash).await);
        assert!(!hasher.verify("", &hash).await);
    }

    #[tokio::test]
    async fn test_hash_is_salted() {
        let hasher = fast_hasher();
        let first = hasher.hash("same-password").await.unwrap();
        let second = hasher.hash("same-password").await.unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same-password", &first).await);
        assert!(hasher.verify("same-password", &second).await);
    }

    #[tokio::test]
    async fn test_cost_embedded_in_hash() {
        let hash = PasswordHasher::new(5).hash("pw").await.unwrap();
        assert!(hash.starts_with("$2b$05$"));

        // Verification reads the cost from the hash, not from the hasher
        assert!(PasswordHasher::new(12).verify("pw", &hash).await);
    }

    #[tokio::test]
    async fn test_malformed_stored_hash_is_a_mismatch() {
        let hasher = fast_hasher();
        assert!(!hasher.verify("pw", "not-a-bcrypt-hash").await);
        assert!(!hasher.verify("pw", "").await);
    }

    #[tokio::test]
    async fn test_invalid_cost_is_an_encoding_error() {
        let err = PasswordHasher::new(99).hash("pw").await.unwrap_err();
        assert!(matches!(err, AccountError::Encoding(_)));
    }

    #[tokio::test]
    async fn test_long_password_refused_not_truncated() {
        let hasher = fast_hasher();
        let p = format!("{}A", "x".repeat(MAX_PASSWORD_BYTES));
        let q = format!("{}B", "x".repeat(MAX_PASSWORD_BYTES));

        assert!(matches!(hasher.hash(&p).await, Err(AccountError::Encoding(_))));

        // Even against a hash of the first 72 bytes, a longer candidate never matches
        let prefix_hash = hasher.hash(&"x".repeat(MAX_PASSWORD_BYTES)).await.unwrap();
        assert!(!hasher.verify(&q, &prefix_hash).await);
        assert!(hasher.verify(&"x".repeat(MAX_PASSWORD_BYTES), &prefix_hash).await);
    }

    #[tokio::test]
    async fn test_verify_absent_pays_full_cost() {
        let hasher = PasswordHasher::new(8);
        let stored = hasher.hash("pw").await.unwrap();

        // First call also builds the decoy hash
        assert!(!hasher.verify_absent("pw").await);

        let start = std::time::Instant::now();
        assert!(!hasher.verify("nope", &stored).await);
        let real = start.elapsed();

        let start = std::time::Instant::now();
        assert!(!hasher.verify_absent("nope").await);
        let decoy = start.elapsed();

        // Same work factor, so within an order of magnitude of each other
        assert!(decoy * 10 >= real, "decoy {:?} vs real {:?}", decoy, real);
        assert!(real * 10 >= decoy, "decoy {:?} vs real {:?}", decoy, real);
    }

    #[test]
    fn test_default_meets_minimum_work_factor() {
        assert!(PasswordHasher::default().cost() >= MIN_WORK_FACTOR);
    }
}
