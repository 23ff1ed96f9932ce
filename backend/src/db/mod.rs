//! Database connection and pool management
//!
//! Only used when the Postgres credential store is selected.

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Pool timeouts that are not worth exposing as configuration
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const IDLE_TIMEOUT: Duration = Duration::from_secs(600); // 10 minutes
const MAX_LIFETIME: Duration = Duration::from_secs(1800); // 30 minutes

/// Create a PostgreSQL connection pool
///
/// The acquire timeout is kept well under the request timeout so that an
/// unreachable database surfaces as a store error instead of a hung request.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&config.url)
        .context("Invalid database URL")?
        .application_name("keygate");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(1)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await
        .context("Failed to connect to database")?;

    info!(max = config.max_connections, "Database pool created");

    Ok(pool)
}

/// Run embedded database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}

/// Check database health
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!("Database health check failed: {}", e);
            e.into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_timeout_below_request_timeout() {
        let request_timeout = crate::config::AppConfig::default().server.request_timeout_secs;
        assert!(ACQUIRE_TIMEOUT.as_secs() < request_timeout);
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let config = DatabaseConfig {
            backend: crate::config::StoreBackend::Postgres,
            url: "not a url".to_string(),
            max_connections: 1,
        };
        assert!(create_pool(&config).await.is_err());
    }
}
