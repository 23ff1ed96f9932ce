//! Password hashing using bcrypt over a SHA-512 pre-digest
//!
//! The plaintext is first reduced to a fixed 64-byte SHA-512 digest, which
//! is then fed to bcrypt. bcrypt only reads the first 72 bytes of its input,
//! so the digest keeps long passwords from being silently truncated and
//! gives the adaptive primitive a constant-length input.
//!
//! # Performance Considerations
//!
//! bcrypt is intentionally CPU-intensive. In async contexts use the
//! `*_async` variants, which run on the blocking thread pool.

use anyhow::Result;
use sha2::{Digest, Sha512};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Plaintext behind the decoy hash. What it is does not matter, the
/// verification result is always discarded.
const DECOY_PASSWORD: &str = "keygate-decoy-credential";

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password with the given bcrypt cost (blocking operation)
    ///
    /// Every call draws a fresh salt, so hashing the same password twice
    /// yields two different strings that both verify.
    pub fn hash(password: &str, cost: u32) -> Result<String> {
        let digest = Self::prehash(password);
        bcrypt::hash(digest, cost).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(password: String, cost: u32) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// A malformed stored hash is reported as a mismatch. Callers cannot
    /// tell the two apart.
    pub fn verify(password: &str, hash: &str) -> bool {
        let digest = Self::prehash(password);
        match bcrypt::verify(digest, hash) {
            Ok(matches) => matches,
            Err(e) => {
                debug!("Stored password hash could not be parsed: {}", e);
                false
            }
        }
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))
    }

    fn prehash(password: &str) -> Vec<u8> {
        Sha512::digest(password.as_bytes()).to_vec()
    }
}

/// A throwaway hash at the configured cost
///
/// Login branches that have no stored hash to check (unknown email, store
/// failure, password outside policy) verify against this instead, so every
/// failed login spends one bcrypt verification. Built on first use and
/// shared by clones.
#[derive(Clone)]
pub struct DecoyHash {
    cost: u32,
    hash: Arc<OnceCell<String>>,
}

impl DecoyHash {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            hash: Arc::new(OnceCell::new()),
        }
    }

    /// The decoy hash, computing it if needed
    pub async fn get(&self) -> Result<&str> {
        let cost = self.cost;
        self.hash
            .get_or_try_init(|| PasswordService::hash_async(DECOY_PASSWORD.to_string(), cost))
            .await
            .map(String::as_str)
    }

    /// Whether the decoy has been built yet
    pub fn is_built(&self) -> bool {
        self.hash.initialized()
    }

    /// Run one verification against the decoy and discard the outcome
    pub async fn burn(&self, password: String) {
        match self.get().await {
            Ok(hash) => {
                let _ = PasswordService::verify_async(password, hash.to_string()).await;
            }
            Err(e) => debug!("Decoy hash unavailable: {:?}", e),
        }
    }
}
