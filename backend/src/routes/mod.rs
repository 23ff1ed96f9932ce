//! Route definitions for the Keygate API
//!
//! This module organizes all API routes and applies middleware.

use crate::config::ServerConfig;
use crate::state::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

mod auth;
mod health;
mod session;


pub use auth::{auth_routes, POST_LOGIN_REDIRECT};
pub use session::session_routes;

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 16 * 1024;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let server = &state.config().server;
    let timeout = Duration::from_secs(server.request_timeout_secs);
    let cors = cors_layer(server);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(health::metrics))
        .nest("/api/v1", api_routes(state.clone()))
        // Apply middleware layers
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Keygate API v1" }))
        .nest("/auth", auth::auth_routes())
        .merge(session::session_routes(state))
}

/// CORS policy from configuration
///
/// With no configured origins any origin is allowed, without credentials.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::AUTHORIZATION]);

    if server.cors_origins.is_empty() {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}
