//! Credential storage
//!
//! The service depends only on the [`CredentialStore`] trait; Postgres and
//! in-memory implementations live here.

pub mod credential;
pub mod memory;

pub use credential::{Credential, CredentialStore, PgCredentialStore, StoreError};
pub use memory::InMemoryCredentialStore;
