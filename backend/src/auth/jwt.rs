//! JWT session token issuance and validation
//!
//! Tokens are HS256-signed and carry the account email and role. The signing
//! key is fixed when the service is built and never changes afterwards, so a
//! token stays verifiable for its whole validity window.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use keygate_shared::{AuthError, Role};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Length of a generated signing key in bytes
const GENERATED_KEY_LEN: usize = 32;

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account email
    pub email: String,
    /// Account role
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// A freshly signed token and the instant it stops being valid
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create JWT keys from secret bytes
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret)),
            decoding: Arc::new(DecodingKey::from_secret(secret)),
        }
    }

    /// Create keys from a random secret drawn from the OS RNG
    pub fn generate() -> anyhow::Result<Self> {
        let mut secret = [0u8; GENERATED_KEY_LEN];
        OsRng
            .try_fill_bytes(&mut secret)
            .map_err(|e| anyhow::anyhow!("Failed to generate signing key: {}", e))?;
        Ok(Self::new(&secret))
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// JWT service for token operations
///
/// Build once at startup and share through `AppState`. Cloning only bumps
/// reference counts.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Arc<Validation>,
    expiry_secs: i64,
}

impl JwtService {
    /// Create a JWT service signing with `secret`
    pub fn new(secret: &str, expiry_secs: i64) -> Self {
        Self::from_keys(JwtKeys::new(secret.as_bytes()), expiry_secs)
    }

    /// Create a JWT service from pre-computed keys
    pub fn from_keys(keys: JwtKeys, expiry_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            keys,
            validation: Arc::new(validation),
            expiry_secs,
        }
    }

    /// Issue a token for an account, valid from now
    #[inline]
    pub fn issue(&self, email: &str, role: Role) -> anyhow::Result<IssuedToken> {
        self.issue_at(email, role, Utc::now())
    }

    /// Issue a token as if signed at `issued_at`
    pub fn issue_at(
        &self,
        email: &str,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> anyhow::Result<IssuedToken> {
        let expires_at = issued_at + Duration::seconds(self.expiry_secs);

        let claims = Claims {
            email: email.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, self.keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Validate a token and return its claims
    ///
    /// Expired tokens map to [`AuthError::TokenExpired`], every other failure
    /// to [`AuthError::InvalidToken`]. Both must be reported identically to
    /// the caller; the split exists for logs only.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, self.keys.decoding(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })
    }
}
