//! Keygate Shared Library
//!
//! Wire types, roles and input validation shared by the backend and any
//! client that talks to it.

pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
