//! Account service: registration and login
//!
//! # Enumeration resistance
//!
//! Login collapses "no such email", "store unavailable" and "wrong password"
//! into one `AuthError::InvalidCredentials`. The cause is only visible in
//! the logs and in the `keygate_login_failures_total{reason}` counter.
//!
//! Every failed login also costs one bcrypt verification. Branches without
//! a stored hash verify against the [`DecoyHash`], so response time does not
//! reveal whether an email is registered.

use crate::auth::{DecoyHash, IssuedToken, JwtService, PasswordService};
use crate::error::{ApiError, PASSWORD_MISMATCH};
use crate::repositories::{Credential, CredentialStore, StoreError};
use keygate_shared::validation::{password_within_policy, validate_login, validate_registration};
use keygate_shared::{AuthError, LoginRequest, RegisterRequest};
use tracing::{error, info, warn};

/// Account service for credential operations
pub struct AccountService;

impl AccountService {
    /// Register a new account
    ///
    /// Each step must pass before the next runs, and the store is only
    /// written in the last one. No token is issued.
    pub async fn register(
        store: &dyn CredentialStore,
        bcrypt_cost: u32,
        req: RegisterRequest,
    ) -> Result<(), ApiError> {
        let role = validate_registration(&req).map_err(|e| {
            record_registration("invalid");
            e
        })?;

        match store.find_by_email(&req.email).await {
            Ok(None) => {}
            Ok(Some(_)) => {
                info!(email = %req.email, "Registration rejected: email already registered");
                record_registration("duplicate");
                return Err(StoreError::Duplicate.into());
            }
            Err(e) => {
                record_registration("store_error");
                return Err(e.into());
            }
        }

        if req.password != req.confirm_password {
            record_registration("mismatch");
            return Err(ApiError::BadRequest(PASSWORD_MISMATCH));
        }

        let password_hash = PasswordService::hash_async(req.password, bcrypt_cost).await?;

        let credential = Credential {
            email: req.email,
            password_hash,
            role,
        };
        if let Err(e) = store.insert(&credential).await {
            // A concurrent registration can win between lookup and insert
            if matches!(e, StoreError::Duplicate) {
                warn!(email = %credential.email, "Registration lost insert race");
                record_registration("duplicate");
            } else {
                record_registration("store_error");
            }
            return Err(e.into());
        }

        info!(email = %credential.email, role = %credential.role, "Account registered");
        record_registration("created");
        Ok(())
    }

    /// Authenticate and issue a session token
    pub async fn login(
        store: &dyn CredentialStore,
        jwt: &JwtService,
        decoy: &DecoyHash,
        req: LoginRequest,
    ) -> Result<IssuedToken, ApiError> {
        validate_login(&req)?;
        if !password_within_policy(&req.password) {
            info!(email = %req.email, "Login failed: password outside length policy");
            record_login_failure("password_policy");
            decoy.burn(req.password).await;
            return Err(AuthError::InvalidCredentials.into());
        }

        let credential = match store.find_by_email(&req.email).await {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                info!(email = %req.email, "Login failed: unknown email");
                record_login_failure("unknown_email");
                decoy.burn(req.password).await;
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => {
                error!(email = %req.email, "Login failed: credential lookup error: {:?}", e);
                record_login_failure("store_error");
                decoy.burn(req.password).await;
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let valid =
            PasswordService::verify_async(req.password, credential.password_hash.clone()).await?;
        if !valid {
            info!(email = %req.email, "Login failed: wrong password");
            record_login_failure("bad_password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let issued = jwt.issue(&credential.email, credential.role)?;

        info!(email = %credential.email, "Login succeeded");
        metrics::counter!("keygate_logins_total").increment(1);
        Ok(issued)
    }
}

fn record_registration(outcome: &'static str) {
    metrics::counter!("keygate_registrations_total", "outcome" => outcome).increment(1);
}

fn record_login_failure(reason: &'static str) {
    metrics::counter!("keygate_login_failures_total", "reason" => reason).increment(1);
}
