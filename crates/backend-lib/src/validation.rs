// ============================
// crates/backend-lib/src/validation.rs
// ============================
//! Request shape validation.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

// Common validation constants
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// A single field-level validation failure, surfaced to the client in the
/// `errors` array of a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Normalize an email for storage and lookup: trim and lower-case.
/// Comparison everywhere else is on the normalized form.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

fn check_email(email: &str, violations: &mut Vec<FieldViolation>) {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH || !EMAIL_REGEX.is_match(email) {
        violations.push(FieldViolation::new(
            "email",
            "must be a well-formed email address",
        ));
    }
}

/// Validate a registration request. The email must already be normalized.
pub fn validate_registration(
    email: &str,
    password: &str,
    min_password_length: usize,
) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();

    check_email(email, &mut violations);

    if password.len() < min_password_length {
        violations.push(FieldViolation::new(
            "password",
            &format!("must be at least {min_password_length} characters"),
        ));
    } else if password.len() > MAX_PASSWORD_LENGTH {
        violations.push(FieldViolation::new(
            "password",
            &format!("must be at most {MAX_PASSWORD_LENGTH} characters"),
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Validate a login request: well-formed email, password merely present.
pub fn validate_login(email: &str, password: &str) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();

    check_email(email, &mut violations);

    if password.is_empty() {
        violations.push(FieldViolation::new("password", "must not be empty"));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
