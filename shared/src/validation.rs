//! Input validation functions
//!
//! Field rules live on the request types as `validator` derives. These
//! helpers run them and fold the result into a single [`InputError`], so
//! no field-level detail leaks past the service boundary.

use crate::errors::InputError;
use crate::types::{LoginRequest, RegisterRequest, Role};
use validator::{Validate, ValidationErrors};

/// Password length bounds, matching the `RegisterRequest` derive rules
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 128;

/// Structural checks for a registration request
///
/// Returns the parsed role on success. Password/confirmation equality is
/// deliberately not checked here.
pub fn validate_registration(req: &RegisterRequest) -> Result<Role, InputError> {
    req.validate().map_err(summarize)?;
    validate_role(&req.role)
}

/// Structural checks for a login request
///
/// Only the email is checked here. A password outside the length policy can
/// never match a stored credential, so login treats it as a failed
/// credential check instead of an input error.
pub fn validate_login(req: &LoginRequest) -> Result<(), InputError> {
    req.validate().map_err(summarize)
}

/// Whether a password length is acceptable (8 to 128 characters)
pub fn password_within_policy(password: &str) -> bool {
    (PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&password.chars().count())
}

/// Validate role membership
pub fn validate_role(role: &str) -> Result<Role, InputError> {
    role.parse()
}

/// Collapse per-field errors into the names of the offending fields
fn summarize(errors: ValidationErrors) -> InputError {
    let mut fields: Vec<String> = errors.errors().keys().map(|k| k.to_string()).collect();
    fields.sort_unstable();
    InputError::Invalid(fields.join(", "))
}
