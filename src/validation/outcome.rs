//! Result shapes produced by schema validation.

use crate::error::IssueKind;
use indexmap::IndexMap;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Path used for failures that belong to the input as a whole
pub const ROOT_PATH: &str = "";

/// A single field-qualified validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dot-joined field path, same naming as the input object
    pub field: String,
    /// Human-readable message
    pub message: String,
    /// Failure classification
    pub kind: IssueKind,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind,
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, IssueKind::MissingRequired, "Required")
    }

    /// Whether the failure applies to the whole input rather than one field
    pub fn is_form_level(&self) -> bool {
        self.field == ROOT_PATH
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_form_level() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Ordered list of field errors from one validation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "validation failed: {}", joined)
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn single(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn as_slice(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors
    }

    /// Errors attached to exactly this field path
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.field == field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Distinct failing field paths in first-seen order
    pub fn fields(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for error in &self.errors {
            if !seen.contains(&error.field.as_str()) {
                seen.push(&error.field);
            }
        }
        seen
    }

    /// Messages grouped by field path, for form renderers
    pub fn field_messages(&self) -> IndexMap<String, Vec<String>> {
        let mut map: IndexMap<String, Vec<String>> = IndexMap::new();
        for error in &self.errors {
            map.entry(error.field.clone())
                .or_default()
                .push(error.message.clone());
        }
        map
    }

    /// Prefix every path with `prefix`, used when nesting object schemas
    pub(crate) fn nest_under(self, prefix: &str) -> Self {
        let errors = self
            .errors
            .into_iter()
            .map(|mut e| {
                e.field = join_path(prefix, &e.field);
                e
            })
            .collect();
        Self { errors }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Joins two path segments with a dot, skipping empty segments
pub(crate) fn join_path(prefix: &str, segment: &str) -> String {
    match (prefix.is_empty(), segment.is_empty()) {
        (true, _) => segment.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}.{}", prefix, segment),
    }
}

/// Uniform validation result.
///
/// Serialises as `{"ok": true, "value": ...}` or
/// `{"ok": false, "errors": [{"field", "message", "kind"}, ...]}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome<T> {
    Valid(T),
    Invalid(ValidationErrors),
}

impl<T> ValidationOutcome<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ValidationOutcome::Valid(value) => Some(value),
            ValidationOutcome::Invalid(_) => None,
        }
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            ValidationOutcome::Valid(_) => None,
            ValidationOutcome::Invalid(errors) => Some(errors),
        }
    }

    pub fn into_result(self) -> Result<T, ValidationErrors> {
        match self {
            ValidationOutcome::Valid(value) => Ok(value),
            ValidationOutcome::Invalid(errors) => Err(errors),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValidationOutcome<U> {
        match self {
            ValidationOutcome::Valid(value) => ValidationOutcome::Valid(f(value)),
            ValidationOutcome::Invalid(errors) => ValidationOutcome::Invalid(errors),
        }
    }
}

impl<T> From<Result<T, ValidationErrors>> for ValidationOutcome<T> {
    fn from(result: Result<T, ValidationErrors>) -> Self {
        match result {
            Ok(value) => ValidationOutcome::Valid(value),
            Err(errors) => ValidationOutcome::Invalid(errors),
        }
    }
}

impl<T: Serialize> Serialize for ValidationOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationOutcome", 2)?;
        match self {
            ValidationOutcome::Valid(value) => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("value", value)?;
            }
            ValidationOutcome::Invalid(errors) => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("errors", errors)?;
            }
        }
        state.end()
    }
}
