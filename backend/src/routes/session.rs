//! Routes that require a valid session token
//!
//! Everything nested here sits behind `require_auth`. Role is exposed to
//! handlers but nothing is gated on it yet.

use crate::auth::{require_auth, AuthUser};
use crate::state::AppState;
use axum::{middleware, routing::get, Extension, Json, Router};
use keygate_shared::SessionInfo;

/// Create protected routes
pub fn session_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// GET /api/v1/dashboard - Identity of the current session
async fn dashboard(Extension(user): Extension<AuthUser>) -> Json<SessionInfo> {
    Json(SessionInfo {
        email: user.email,
        role: user.role,
    })
}
