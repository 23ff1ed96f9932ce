//! Health check endpoints
//!
//! Provides Kubernetes-compatible health check endpoints:
//! - /health - Basic health check
//! - /health/ready - Readiness probe (checks the credential store)
//! - /health/live - Liveness probe (always returns OK if server is running)

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

/// Readiness message when the store cannot be reached. Detail goes to the log.
const STORE_UNREACHABLE: &str = "unreachable";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

/// Individual health checks
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub credential_store: CheckStatus,
}

/// Status of an individual check
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

fn simple(status: &'static str) -> Json<HealthResponse> {
    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        checks: None,
    })
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    simple("healthy")
}

/// Readiness probe - checks if the service is ready to accept traffic
/// Returns 503 if the credential store is unreachable
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = match state.store().ping().await {
        Ok(()) => CheckStatus {
            status: "healthy",
            message: None,
        },
        Err(e) => {
            warn!("Readiness check failed: credential store error: {:?}", e);
            CheckStatus {
                status: "unhealthy",
                message: Some(STORE_UNREACHABLE),
            }
        }
    };

    let is_healthy = store_check.status == "healthy";

    let response = Json(HealthResponse {
        status: if is_healthy { "ready" } else { "not_ready" },
        version: env!("CARGO_PKG_VERSION"),
        checks: Some(HealthChecks {
            credential_store: store_check,
        }),
    });

    if is_healthy {
        Ok(response)
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, response))
    }
}

/// Liveness probe - checks if the service is alive
pub async fn liveness_check() -> Json<HealthResponse> {
    simple("alive")
}

/// Prometheus scrape endpoint
///
/// 404 when no recorder was installed.
pub async fn metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or(StatusCode::NOT_FOUND)
}
