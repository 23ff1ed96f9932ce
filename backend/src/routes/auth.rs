//! Authentication routes
//!
//! Registration and login endpoints. Bodies that are not valid JSON for the
//! request type are rejected with the generic "Invalid JSON format" error.

use crate::auth::BEARER_PREFIX;
use crate::error::{ApiError, ApiResult, INVALID_JSON};
use crate::services::AccountService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    routing::post,
    Json, Router,
};
use keygate_shared::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
use tracing::warn;

/// Where a client should go after logging in
pub const POST_LOGIN_REDIRECT: &str = "dashboard";

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new account
///
/// POST /api/v1/auth/register
pub(crate) async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Json(req) = payload.map_err(reject_json)?;

    AccountService::register(state.store(), state.config().auth.bcrypt_cost, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully".to_string(),
        }),
    ))
}

/// Login with email and password
///
/// POST /api/v1/auth/login
///
/// The token is returned both in the body and as an `Authorization` header.
pub(crate) async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<([(axum::http::HeaderName, HeaderValue); 1], Json<LoginResponse>)> {
    let Json(req) = payload.map_err(reject_json)?;

    let issued = AccountService::login(state.store(), state.jwt(), state.decoy(), req).await?;

    let header = HeaderValue::from_str(&format!("{}{}", BEARER_PREFIX, issued.token))
        .map_err(|e| anyhow::anyhow!("Token is not a valid header value: {}", e))?;

    Ok((
        [(AUTHORIZATION, header)],
        Json(LoginResponse {
            token: issued.token,
            redirect: POST_LOGIN_REDIRECT.to_string(),
        }),
    ))
}

fn reject_json(rejection: JsonRejection) -> ApiError {
    warn!("Rejected request body: {}", rejection.body_text());
    ApiError::BadRequest(INVALID_JSON)
}
