//! API request and response types

use crate::errors::InputError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Account role
///
/// Closed set. Stored with the credential and carried in every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Guest,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Guest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Guest => "guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "guest" => Ok(Role::Guest),
            other => Err(InputError::UnknownRole(other.to_string())),
        }
    }
}

/// Registration request
///
/// Missing fields deserialize as empty strings so that they fail validation
/// with the same generic error as any other bad field.
#[derive(Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(email, length(min = 5, max = 254))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub confirm_password: String,
    #[serde(default)]
    pub role: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Login request
#[derive(Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email, length(min = 5, max = 254))]
    pub email: String,
    /// Length policy is checked separately, see
    /// [`password_within_policy`](crate::validation::password_within_policy)
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login response
///
/// `redirect` names the page a client should open after signing in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub redirect: String,
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// API error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_is_case_sensitive() {
        assert!("Admin".parse::<Role>().is_err());
        assert!("GUEST".parse::<Role>().is_err());
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"guest\"").unwrap(),
            Role::Guest
        );
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@b.io","password":"longenough1"}"#).unwrap();
        assert!(req.confirm_password.is_empty());
        assert!(req.role.is_empty());
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let req = RegisterRequest {
            email: "user@test.io".to_string(),
            password: "hunter2hunter2".to_string(),
            confirm_password: "hunter2hunter2".to_string(),
            role: "guest".to_string(),
        };
        let debug = format!("{:?}", req);
        assert!(debug.contains("user@test.io"));
        assert!(!debug.contains("hunter2"));

        let login = LoginRequest {
            email: "user@test.io".to_string(),
            password: "hunter2hunter2".to_string(),
        };
        assert!(!format!("{:?}", login).contains("hunter2"));
    }
}
