//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! The signing key is fixed here, once, and nothing downstream can replace
//! it. Every token issued by this process stays verifiable by this process
//! until it expires.

use crate::auth::{DecoyHash, JwtKeys, JwtService};
use crate::config::AppConfig;
use crate::repositories::CredentialStore;
use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::warn;

/// Shared application state
///
/// All fields are cheap to clone across async tasks.
#[derive(Clone)]
pub struct AppState {
    /// Credential store
    pub store: Arc<dyn CredentialStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// JWT service holding the process-wide signing key
    pub jwt: JwtService,
    /// Hash verified on login failures that have no stored hash
    pub decoy: DecoyHash,
    /// Prometheus handle, when a recorder was installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// With no configured secret a random signing key is generated; tokens
    /// then do not survive a restart.
    pub fn new(store: Arc<dyn CredentialStore>, config: AppConfig) -> Result<Self> {
        let keys = if config.jwt.secret.is_empty() {
            warn!("No JWT secret configured, generating an ephemeral signing key");
            JwtKeys::generate()?
        } else {
            JwtKeys::new(config.jwt.secret.as_bytes())
        };
        let jwt = JwtService::from_keys(keys, config.jwt.token_expiry_secs);
        let decoy = DecoyHash::new(config.auth.bcrypt_cost);

        Ok(Self {
            store,
            config: Arc::new(config),
            jwt,
            decoy,
            metrics: None,
        })
    }

    /// Attach a Prometheus handle for the /metrics endpoint
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the credential store
    #[inline]
    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the JWT service
    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Get a reference to the login decoy hash
    #[inline]
    pub fn decoy(&self) -> &DecoyHash {
        &self.decoy
    }
}
