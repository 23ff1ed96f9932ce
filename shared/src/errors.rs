//! Error types shared between the service and its clients

use thiserror::Error;

/// Input validation errors
///
/// The display text is for logs. Callers only ever see a generic message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// Authentication error types
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing token")]
    MissingToken,
}
