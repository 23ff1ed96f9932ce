//! Keygate Backend
//!
//! Registers account credentials and authenticates returning users with
//! short-lived bearer tokens.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling and routing
//! - Services: Registration and login flows
//! - Repositories: Credential store (Postgres or in-memory)
//! - Auth: Password hashing, token signing, bearer-token middleware

use anyhow::Result;
use keygate_backend::{
    config::{self, StoreBackend},
    db,
    repositories::{CredentialStore, InMemoryCredentialStore, PgCredentialStore},
    routes,
    state::AppState,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting Keygate Backend"
    );

    // Validate configuration
    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    } else {
        validate_config(&config)?;
    }

    let store = create_store(&config).await?;

    // Create application state; the signing key is fixed from here on
    let mut state = AppState::new(store, config.clone())?;
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!("Metrics recorder not installed: {}", e),
    }

    // Build the login decoy now so the first failed login is not slower
    state.decoy().get().await?;

    // Build application
    let app = routes::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Build the configured credential store
async fn create_store(config: &config::AppConfig) -> Result<Arc<dyn CredentialStore>> {
    match config.database.backend {
        StoreBackend::Postgres => {
            info!("Connecting to database...");
            let pool = db::create_pool(&config.database).await?;

            // Skip in production if using separate migration job
            if !config::AppConfig::is_production() {
                info!("Running database migrations...");
                db::run_migrations(&pool).await?;
            }

            Ok(Arc::new(PgCredentialStore::new(pool)))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory credential store; accounts are lost on restart");
            Ok(Arc::new(InMemoryCredentialStore::new()))
        }
    }
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "keygate_backend=info,tower_http=info".into()
        } else {
            "keygate_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Validate configuration outside production
fn validate_config(config: &config::AppConfig) -> Result<()> {
    report_problems(&config.problems(), "Invalid configuration")
}

/// Validate configuration for production deployment
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    if config.jwt.secret.is_empty() {
        warn!("No JWT secret configured; tokens will not survive a restart");
    }

    report_problems(&config.production_problems(), "Invalid production configuration")
}

fn report_problems(problems: &[&'static str], summary: &'static str) -> Result<()> {
    if !problems.is_empty() {
        for problem in problems {
            error!("Configuration error: {}", problem);
        }
        anyhow::bail!(summary);
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
