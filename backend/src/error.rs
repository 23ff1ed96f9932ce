//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.
//!
//! Client-facing messages are fixed strings. Anything more specific goes to
//! the operator log and never into a response body.

use crate::repositories::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use keygate_shared::{AuthError, ErrorResponse, InputError};
use thiserror::Error;
use tracing::{error, warn};

pub const INVALID_JSON: &str = "Invalid JSON format";
pub const INVALID_INPUT: &str = "Invalid input data";
pub const EMAIL_TAKEN: &str = "Email already registered";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const MISSING_AUTH_HEADER: &str = "Missing authorization header";
pub const INVALID_TOKEN: &str = "Invalid token";
pub const INTERNAL_ERROR: &str = "Error processing request";

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(&'static str),

    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Credential store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Status code and client-facing message for this error
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, *msg),
            ApiError::Input(_) => (StatusCode::BAD_REQUEST, INVALID_INPUT),
            ApiError::Auth(AuthError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS)
            }
            ApiError::Auth(AuthError::MissingToken) => {
                (StatusCode::UNAUTHORIZED, MISSING_AUTH_HEADER)
            }
            ApiError::Auth(AuthError::InvalidToken | AuthError::TokenExpired) => {
                (StatusCode::UNAUTHORIZED, INVALID_TOKEN)
            }
            ApiError::Store(StoreError::Duplicate) => (StatusCode::BAD_REQUEST, EMAIL_TAKEN),
            ApiError::Store(StoreError::Backend(_)) | ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Input(err) => warn!("Validation error: {}", err),
            ApiError::Store(StoreError::Backend(err)) => error!("Credential store error: {:?}", err),
            ApiError::Internal(err) => error!("Internal error: {:?}", err),
            _ => {}
        }

        let (status, message) = self.status_and_message();
        let body = Json(ErrorResponse {
            error: message.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
