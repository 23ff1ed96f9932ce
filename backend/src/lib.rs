//! Keygate Backend Library
//!
//! Credential registration, password verification and session token
//! issuance. Exposed as a library for integration tests.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
