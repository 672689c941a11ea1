//! Precondition validators and best-effort parsing.
//!
//! The `require_*` functions are for call sites that already treat a value as
//! trusted, so a failure is a broken precondition rather than user input to
//! report field by field. They return `Err` and callers propagate with `?`.

use crate::validation::constants::{EMAIL_PATTERN, OPAQUE_ID_PATTERN, user};
use crate::validation::schema::TypedSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Result type for precondition checks
pub type PreconditionResult<T> = Result<T, PreconditionError>;

/// A value that a caller assumed valid was not
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PreconditionError {
    #[error("invalid id '{id}'")]
    InvalidId { id: String },

    #[error("invalid email address '{email}'")]
    InvalidEmail { email: String },

    #[error(
        "password must be between {min} and {max} characters, got {len}",
        min = user::PASSWORD_MIN,
        max = user::PASSWORD_MAX
    )]
    InvalidPassword { len: usize },

    #[error("parameter '{parameter}' value {value} is outside valid range [{min}, {max}]")]
    NumberOutOfRange {
        parameter: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Require an opaque record identifier
///
/// # Examples
///
/// ```
/// use skilltrack_schema::validation::require_id;
///
/// assert!(require_id("cjld2cjxh0000qzrmn831i7rn").is_ok());
/// assert!(require_id("").is_err());
/// assert!(require_id("42").is_err());
/// ```
pub fn require_id(id: &str) -> PreconditionResult<&str> {
    if OPAQUE_ID_PATTERN.is_match(id) {
        Ok(id)
    } else {
        Err(PreconditionError::InvalidId { id: id.to_string() })
    }
}

pub fn require_email(email: &str) -> PreconditionResult<&str> {
    if email.chars().count() <= user::EMAIL_MAX && EMAIL_PATTERN.is_match(email) {
        Ok(email)
    } else {
        Err(PreconditionError::InvalidEmail {
            email: email.to_string(),
        })
    }
}

/// Require a password within the new-password length bounds
pub fn require_password(password: &str) -> PreconditionResult<&str> {
    let len = password.chars().count();
    if (user::PASSWORD_MIN..=user::PASSWORD_MAX).contains(&len) {
        Ok(password)
    } else {
        Err(PreconditionError::InvalidPassword { len })
    }
}

/// Require `value` within `[min, max]`, both ends inclusive
///
/// # Examples
///
/// ```
/// use skilltrack_schema::validation::require_number_in_range;
///
/// assert!(require_number_in_range("rating", 5.0, 1.0, 5.0).is_ok());
/// assert!(require_number_in_range("rating", 0.0, 1.0, 5.0).is_err());
/// ```
pub fn require_number_in_range(
    parameter: &str,
    value: f64,
    min: f64,
    max: f64,
) -> PreconditionResult<f64> {
    if value.is_nan() || value < min || value > max {
        Err(PreconditionError::NumberOutOfRange {
            parameter: parameter.to_string(),
            value,
            min,
            max,
        })
    } else {
        Ok(value)
    }
}

/// Parse `input`, falling back to `default` when it is invalid
pub fn parse_or<T: DeserializeOwned>(schema: &TypedSchema<T>, input: &Value, default: T) -> T {
    parse_or_else(schema, input, || default)
}

/// Parse `input`, computing a fallback only when it is invalid
pub fn parse_or_else<T, F>(schema: &TypedSchema<T>, input: &Value, fallback: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match schema.parse(input) {
        Ok(value) => value,
        Err(errors) => {
            tracing::debug!(
                error_count = errors.len(),
                fields = ?errors.fields(),
                "input rejected, using fallback value"
            );
            fallback()
        }
    }
}
