//! Error types for the validation layer.
//!
//! Two families live here:
//! - [`IssueKind`]: the taxonomy of ordinary validation failures. These are
//!   returned inside [`crate::validation::ValidationErrors`], never raised.
//! - [`SchemaError`]: misuse of the layer itself (unknown schema identifier,
//!   strict partial derivation of a scalar schema).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// ISSUE KINDS
// =============================================================================

/// Kind of a single field-level validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Value present but of the wrong JSON type
    InvalidType,
    /// Required field absent
    MissingRequired,
    /// Below a minimum length, value or item count
    TooSmall,
    /// Above a maximum length, value or item count
    TooBig,
    /// Value outside a closed token set
    InvalidEnumValue,
    /// Right type, wrong shape (email, url, id, datetime, pattern)
    InvalidFormat,
    /// Undeclared key under a strict object schema
    UnrecognizedKey,
    /// Individually valid fields that violate a relationship
    CrossField,
}

impl IssueKind {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            IssueKind::InvalidType => "invalid_type",
            IssueKind::MissingRequired => "missing_required",
            IssueKind::TooSmall => "too_small",
            IssueKind::TooBig => "too_big",
            IssueKind::InvalidEnumValue => "invalid_enum_value",
            IssueKind::InvalidFormat => "invalid_format",
            IssueKind::UnrecognizedKey => "unrecognized_key",
            IssueKind::CrossField => "cross_field",
        }
    }

    /// Error category used for reporting and metrics labels
    pub fn category(&self) -> &'static str {
        match self {
            IssueKind::InvalidType | IssueKind::InvalidFormat | IssueKind::UnrecognizedKey => {
                "field_format"
            }
            IssueKind::TooSmall | IssueKind::TooBig => "bounds",
            IssueKind::InvalidEnumValue => "enum",
            IssueKind::CrossField => "cross_field",
            IssueKind::MissingRequired => "missing_required",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// SCHEMA ERRORS
// =============================================================================

/// Faults in how the validation layer is called.
///
/// These signal a programming error upstream, not a user mistake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No schema registered under the identifier
    #[error("unknown schema '{name}'")]
    UnknownSchema { name: String },

    /// Strict partial derivation was asked of a scalar schema
    #[error("cannot derive a partial schema from a non-object schema ({type_name})")]
    PartialOfNonObject { type_name: &'static str },
}

/// Result type for registry and schema-construction operations
pub type SchemaResult<T> = Result<T, SchemaError>;
