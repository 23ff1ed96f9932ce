//! Authentication middleware
//!
//! Provides Axum middleware for JWT validation and identity extraction.
//! Every failure after the header is found is reported as the same
//! "Invalid token" response.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use keygate_shared::{AuthError, Role};
use tracing::debug;

/// Scheme prefix expected in the Authorization header
pub const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated identity extracted from a session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    /// Authenticate from request headers
    fn from_headers(headers: &HeaderMap, state: &AppState) -> Result<Self, ApiError> {
        let header = headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?;

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .ok_or_else(|| {
                debug!("Authorization header without bearer scheme");
                AuthError::InvalidToken
            })?;

        let claims = state.jwt().verify(token)?;

        Ok(AuthUser {
            email: claims.email,
            role: claims.role,
        })
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already authenticated by `require_auth`
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let app_state = AppState::from_ref(state);
        AuthUser::from_headers(&parts.headers, &app_state)
    }
}

/// Middleware that gates a group of routes behind a valid bearer token
///
/// On success the [`AuthUser`] is stored in the request extensions for
/// downstream handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = AuthUser::from_headers(request.headers(), &state)?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
