//! Authentication module
//!
//! bcrypt password hashing, HS256 session tokens, and the bearer-token gate
//! for protected routes.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, IssuedToken, JwtKeys, JwtService};
pub use middleware::{require_auth, AuthUser, BEARER_PREFIX};
pub use password::{DecoyHash, PasswordService};
