//! Field-level type checks and validation rules.
//!
//! A [`FieldDef`] describes one input field: its JSON type, whether it must be
//! present and the rules applied once the type check passes. Checking a field
//! never stops at the first failed rule; every rule violation is reported so a
//! form can show all problems at once.

use crate::error::IssueKind;
use crate::validation::constants::{EMAIL_PATTERN, OPAQUE_ID_PATTERN};
use crate::validation::outcome::{FieldError, ValidationErrors, join_path};
use crate::validation::schema::ObjectSchema;
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use strum::VariantNames;

// ============================================================================
// FIELD TYPES
// ============================================================================

/// JSON type expected for a field
#[derive(Debug, Clone)]
pub enum FieldType {
    String,
    /// Whole number; `5.0` is accepted and narrowed to `5`
    Integer,
    /// Any finite number
    Decimal,
    Boolean,
    /// String drawn from a closed token set
    Enum(&'static [&'static str]),
    /// Homogeneous array, every item checked against the item definition
    Array(Box<FieldDef>),
    /// Nested object
    Object(Box<ObjectSchema>),
}

impl FieldType {
    /// Name used in type mismatch messages
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String | FieldType::Enum(_) => "string",
            FieldType::Integer => "integer",
            FieldType::Decimal => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array(_) => "array",
            FieldType::Object(_) => "object",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// JSON type name of a received value
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// VALIDATION RULES
// ============================================================================

/// Rule applied to a value that already has the right type
#[derive(Debug, Clone)]
pub enum ValidationRule {
    /// Minimum string length in characters, inclusive
    MinLength(usize),
    /// Maximum string length in characters, inclusive
    MaxLength(usize),
    /// Minimum numeric value, inclusive
    Min(f64),
    /// Maximum numeric value, inclusive
    Max(f64),
    MinItems(usize),
    MaxItems(usize),
    Email,
    /// Absolute `http` or `https` URL
    Url,
    /// Opaque record identifier
    OpaqueId,
    /// RFC 3339 timestamp, `Z` or numeric offset
    DateTime,
    /// String must match the regex
    Pattern {
        regex: &'static Regex,
        message: &'static str,
    },
}

impl ValidationRule {
    fn kind_and_message(&self, value: &Value) -> Option<(IssueKind, String)> {
        match (self, value) {
            (ValidationRule::MinLength(min), Value::String(s)) if s.chars().count() < *min => Some((
                IssueKind::TooSmall,
                format!("String must contain at least {} character(s)", min),
            )),
            (ValidationRule::MaxLength(max), Value::String(s)) if s.chars().count() > *max => Some((
                IssueKind::TooBig,
                format!("String must contain at most {} character(s)", max),
            )),
            (ValidationRule::Min(min), Value::Number(n)) => match n.as_f64() {
                Some(v) if v < *min => Some((
                    IssueKind::TooSmall,
                    format!("Number must be greater than or equal to {}", min),
                )),
                _ => None,
            },
            (ValidationRule::Max(max), Value::Number(n)) => match n.as_f64() {
                Some(v) if v > *max => Some((
                    IssueKind::TooBig,
                    format!("Number must be less than or equal to {}", max),
                )),
                _ => None,
            },
            (ValidationRule::MinItems(min), Value::Array(items)) if items.len() < *min => Some((
                IssueKind::TooSmall,
                format!("Array must contain at least {} element(s)", min),
            )),
            (ValidationRule::MaxItems(max), Value::Array(items)) if items.len() > *max => Some((
                IssueKind::TooBig,
                format!("Array must contain at most {} element(s)", max),
            )),
            (ValidationRule::Email, Value::String(s)) if !EMAIL_PATTERN.is_match(s) => {
                Some((IssueKind::InvalidFormat, "Invalid email".to_string()))
            }
            (ValidationRule::Url, Value::String(s)) if !is_web_url(s) => {
                Some((IssueKind::InvalidFormat, "Invalid url".to_string()))
            }
            (ValidationRule::OpaqueId, Value::String(s)) if !OPAQUE_ID_PATTERN.is_match(s) => {
                Some((IssueKind::InvalidFormat, "Invalid id".to_string()))
            }
            (ValidationRule::DateTime, Value::String(s)) if parse_datetime(s).is_none() => {
                Some((IssueKind::InvalidFormat, "Invalid datetime".to_string()))
            }
            (ValidationRule::Pattern { regex, message }, Value::String(s)) if !regex.is_match(s) => {
                Some((IssueKind::InvalidFormat, (*message).to_string()))
            }
            _ => None,
        }
    }
}

fn is_web_url(candidate: &str) -> bool {
    match url::Url::parse(candidate) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some(),
        Err(_) => false,
    }
}

/// Parses an RFC 3339 timestamp, keeping its offset
pub(crate) fn parse_datetime(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}

// ============================================================================
// FIELD DEFINITION
// ============================================================================

/// One field of an input shape
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub field_type: FieldType,
    pub required: bool,
    /// Rules in declaration order, each with an optional replacement message
    pub rules: Vec<(ValidationRule, Option<String>)>,
    pub description: Option<String>,
}

impl FieldDef {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: true,
            rules: Vec::new(),
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn integer() -> Self {
        Self::new(FieldType::Integer)
    }

    pub fn decimal() -> Self {
        Self::new(FieldType::Decimal)
    }

    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    /// String restricted to the variant names of a strum enum
    pub fn enumeration<E: VariantNames>() -> Self {
        Self::new(FieldType::Enum(E::VARIANTS))
    }

    pub fn one_of(tokens: &'static [&'static str]) -> Self {
        Self::new(FieldType::Enum(tokens))
    }

    pub fn array(item: FieldDef) -> Self {
        Self::new(FieldType::Array(Box::new(item)))
    }

    pub fn object(schema: ObjectSchema) -> Self {
        Self::new(FieldType::Object(Box::new(schema)))
    }

    /// Opaque identifier string
    pub fn id() -> Self {
        Self::string().opaque_id()
    }

    /// RFC 3339 timestamp string
    pub fn datetime_string() -> Self {
        Self::string().datetime()
    }

    /// Field may be absent
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push((rule, None));
        self
    }

    /// Replace the message of the most recently added rule
    pub fn message(mut self, message: impl Into<String>) -> Self {
        if let Some((_, slot)) = self.rules.last_mut() {
            *slot = Some(message.into());
        }
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn min_length(self, min: usize) -> Self {
        self.rule(ValidationRule::MinLength(min))
    }

    pub fn max_length(self, max: usize) -> Self {
        self.rule(ValidationRule::MaxLength(max))
    }

    /// Inclusive character-count range
    pub fn length(self, min: usize, max: usize) -> Self {
        self.min_length(min).max_length(max)
    }

    pub fn min(self, min: impl Into<f64>) -> Self {
        self.rule(ValidationRule::Min(min.into()))
    }

    pub fn max(self, max: impl Into<f64>) -> Self {
        self.rule(ValidationRule::Max(max.into()))
    }

    /// Inclusive numeric range
    pub fn range(self, min: impl Into<f64>, max: impl Into<f64>) -> Self {
        self.min(min).max(max)
    }

    pub fn min_items(self, min: usize) -> Self {
        self.rule(ValidationRule::MinItems(min))
    }

    pub fn max_items(self, max: usize) -> Self {
        self.rule(ValidationRule::MaxItems(max))
    }

    pub fn email(self) -> Self {
        self.rule(ValidationRule::Email)
    }

    pub fn url(self) -> Self {
        self.rule(ValidationRule::Url)
    }

    pub fn opaque_id(self) -> Self {
        self.rule(ValidationRule::OpaqueId)
    }

    pub fn datetime(self) -> Self {
        self.rule(ValidationRule::DateTime)
    }

    pub fn pattern(self, regex: &'static Regex, message: &'static str) -> Self {
        self.rule(ValidationRule::Pattern { regex, message })
    }

    /// Check a present value at `path`, returning the narrowed value
    pub(crate) fn check(&self, path: &str, value: &Value) -> Result<Value, ValidationErrors> {
        let narrowed = self.check_type(path, value)?;

        let mut errors: Vec<FieldError> = Vec::new();
        for (rule, custom) in &self.rules {
            if let Some((kind, message)) = rule.kind_and_message(&narrowed) {
                let message = custom.clone().unwrap_or(message);
                errors.push(FieldError::new(path, kind, message));
            }
        }

        if errors.is_empty() {
            Ok(narrowed)
        } else {
            Err(ValidationErrors::new(errors))
        }
    }

    fn check_type(&self, path: &str, value: &Value) -> Result<Value, ValidationErrors> {
        let mismatch = |expected: &str, received: &str| {
            ValidationErrors::single(FieldError::new(
                path,
                IssueKind::InvalidType,
                format!("Expected {}, received {}", expected, received),
            ))
        };

        match (&self.field_type, value) {
            (FieldType::String, Value::String(_)) | (FieldType::Boolean, Value::Bool(_)) => {
                Ok(value.clone())
            }
            (FieldType::Decimal, Value::Number(n)) => match n.as_f64() {
                Some(f) if f.is_finite() => Ok(value.clone()),
                _ => Err(mismatch("number", "nan")),
            },
            (FieldType::Integer, Value::Number(n)) => {
                if n.is_i64() {
                    return Ok(value.clone());
                }
                // Narrowed types hold i64
                let out_of_range = |kind, bound: i64, relation: &str| {
                    ValidationErrors::single(FieldError::new(
                        path,
                        kind,
                        format!("Number must be {} {}", relation, bound),
                    ))
                };
                if n.is_u64() {
                    return Err(out_of_range(IssueKind::TooBig, i64::MAX, "less than or equal to"));
                }
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 => {
                        if f < i64::MIN as f64 {
                            Err(out_of_range(IssueKind::TooSmall, i64::MIN, "greater than or equal to"))
                        } else if f >= i64::MAX as f64 {
                            Err(out_of_range(IssueKind::TooBig, i64::MAX, "less than or equal to"))
                        } else {
                            Ok(Value::from(f as i64))
                        }
                    }
                    _ => Err(mismatch("integer", "float")),
                }
            }
            (FieldType::Enum(tokens), Value::String(s)) if tokens.iter().any(|t| *t == s) => {
                Ok(value.clone())
            }
            (FieldType::Enum(tokens), other) => {
                let received = match other {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let expected = tokens
                    .iter()
                    .map(|t| format!("'{}'", t))
                    .collect::<Vec<_>>()
                    .join(" | ");
                Err(ValidationErrors::single(FieldError::new(
                    path,
                    IssueKind::InvalidEnumValue,
                    format!(
                        "Invalid enum value. Expected {}, received '{}'",
                        expected, received
                    ),
                )))
            }
            (FieldType::Array(item), Value::Array(items)) => {
                let mut narrowed = Vec::with_capacity(items.len());
                let mut errors: Vec<FieldError> = Vec::new();
                for (index, element) in items.iter().enumerate() {
                    match item.check(&join_path(path, &index.to_string()), element) {
                        Ok(v) => narrowed.push(v),
                        Err(e) => errors.extend(e),
                    }
                }
                if errors.is_empty() {
                    Ok(Value::Array(narrowed))
                } else {
                    Err(ValidationErrors::new(errors))
                }
            }
            (FieldType::Object(schema), Value::Object(_)) => schema.check_at(path, value),
            (expected, received) => Err(mismatch(expected.name(), json_type_name(received))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::constants::USERNAME_PATTERN;
    use serde_json::json;

    fn messages(result: Result<Value, ValidationErrors>) -> Vec<String> {
        result
            .unwrap_err()
            .into_iter()
            .map(|e| e.message)
            .collect()
    }

    #[test]
    fn test_length_counts_characters() {
        let def = FieldDef::string().length(2, 3);
        assert!(def.check("name", &json!("éé")).is_ok());
        assert!(def.check("name", &json!("ééé")).is_ok());
        assert_eq!(
            messages(def.check("name", &json!("é"))),
            vec!["String must contain at least 2 character(s)"]
        );
    }

    #[test]
    fn test_all_rule_failures_reported() {
        let def = FieldDef::string()
            .length(3, 50)
            .pattern(&USERNAME_PATTERN, "Username may only contain letters, numbers and underscores");
        let errors = def.check("username", &json!("a-")).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.field == "username"));
    }

    #[test]
    fn test_type_failure_stops_rules() {
        let def = FieldDef::string().min_length(3);
        let errors = def.check("username", &json!(42)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.as_slice()[0].kind, IssueKind::InvalidType);
        assert_eq!(errors.as_slice()[0].message, "Expected string, received number");
    }

    #[test]
    fn test_null_is_not_a_value() {
        let errors = FieldDef::string().optional().check("bio", &Value::Null).unwrap_err();
        assert_eq!(errors.as_slice()[0].message, "Expected string, received null");
    }

    #[test]
    fn test_integer_beyond_i64_is_too_big() {
        let def = FieldDef::integer().min(0);
        let errors = def.check("experience", &json!(9_223_372_036_854_775_808u64)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.as_slice()[0].field, "experience");
        assert_eq!(errors.as_slice()[0].kind, IssueKind::TooBig);

        let errors = def.check("experience", &json!(-1e20)).unwrap_err();
        assert_eq!(errors.as_slice()[0].kind, IssueKind::TooSmall);
        assert!(def.check("experience", &json!(i64::MAX)).is_ok());
    }

    #[test]
    fn test_integer_accepts_whole_floats() {
        let def = FieldDef::integer().range(1, 5);
        assert_eq!(def.check("rating", &json!(5.0)).unwrap(), json!(5));
        assert_eq!(
            messages(def.check("rating", &json!(4.5))),
            vec!["Expected integer, received float"]
        );
        assert_eq!(
            messages(def.check("rating", &json!(6))),
            vec!["Number must be less than or equal to 5"]
        );
    }

    #[test]
    fn test_decimal_bounds_inclusive() {
        let def = FieldDef::decimal().range(0, 100);
        assert!(def.check("progress", &json!(0)).is_ok());
        assert!(def.check("progress", &json!(100.0)).is_ok());
        assert!(def.check("progress", &json!(100.01)).is_err());
    }

    #[test]
    fn test_enum_message_lists_tokens() {
        let def = FieldDef::one_of(&["USER", "ADMIN"]);
        assert!(def.check("role", &json!("ADMIN")).is_ok());
        assert_eq!(
            messages(def.check("role", &json!("SUPERUSER"))),
            vec!["Invalid enum value. Expected 'USER' | 'ADMIN', received 'SUPERUSER'"]
        );
        assert!(def.check("role", &json!("admin")).is_err());
    }

    #[test]
    fn test_array_items_use_index_segments() {
        let def = FieldDef::array(FieldDef::string().length(1, 30)).max_items(3);
        let errors = def.check("tags", &json!(["ok", "", "fine"])).unwrap_err();
        assert!(errors.has_field("tags.1"));

        let errors = def.check("tags", &json!(["a", "b", "c", "d"])).unwrap_err();
        assert_eq!(errors.as_slice()[0].field, "tags");
        assert_eq!(errors.as_slice()[0].kind, IssueKind::TooBig);
    }

    #[test]
    fn test_url_requires_web_scheme() {
        let def = FieldDef::string().url();
        assert!(def.check("repository", &json!("https://github.com/a/b")).is_ok());
        assert!(def.check("repository", &json!("ftp://example.com")).is_err());
        assert!(def.check("repository", &json!("not a url")).is_err());
    }

    #[test]
    fn test_datetime_and_id_formats() {
        assert!(FieldDef::datetime_string()
            .check("targetDate", &json!("2025-01-01T10:00:00Z"))
            .is_ok());
        assert!(FieldDef::datetime_string()
            .check("targetDate", &json!("2025-01-01T10:00:00+02:00"))
            .is_ok());
        assert!(FieldDef::datetime_string()
            .check("targetDate", &json!("2025-01-01"))
            .is_err());

        assert!(FieldDef::id().check("id", &json!("cjld2cjxh0000qzrmn831i7rn")).is_ok());
        assert_eq!(messages(FieldDef::id().check("id", &json!(""))), vec!["Invalid id"]);
    }

    #[test]
    fn test_custom_message_replaces_last_rule() {
        let def = FieldDef::string().min_length(8).message("Password is too short");
        assert_eq!(
            messages(def.check("password", &json!("short"))),
            vec!["Password is too short"]
        );
    }
}
