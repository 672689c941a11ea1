//! Object schemas, cross-field refinements and typed narrowing.
//!
//! An [`ObjectSchema`] validates a JSON object field by field, then runs its
//! refinements over the narrowed object. [`TypedSchema`] adds a serde target
//! type so callers get a typed value back instead of raw JSON.

use crate::error::{IssueKind, SchemaError, SchemaResult};
use crate::validation::constants::TIME_OF_DAY_PATTERN;
use crate::validation::outcome::{
    FieldError, ROOT_PATH, ValidationErrors, ValidationOutcome, join_path,
};
use crate::validation::rules::{FieldDef, json_type_name, parse_datetime};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

// ============================================================================
// REFINEMENTS
// ============================================================================

type RefinementFn = Arc<dyn Fn(&Map<String, Value>) -> Option<FieldError> + Send + Sync>;

/// Cross-field rule evaluated over an object whose fields all passed
#[derive(Clone)]
pub struct Refinement {
    name: &'static str,
    check: RefinementFn,
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement").field("name", &self.name).finish()
    }
}

impl Refinement {
    /// Custom refinement. Paths in the returned error are relative to the object.
    pub fn new<F>(name: &'static str, check: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> Option<FieldError> + Send + Sync + 'static,
    {
        Self {
            name,
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Rejects objects carrying nothing besides the `excluded` keys
    pub fn at_least_one_besides(excluded: &'static [&'static str], message: &'static str) -> Self {
        Self::new("at_least_one_besides", move |object| {
            let has_change = object.keys().any(|k| !excluded.iter().any(|e| *e == k));
            (!has_change).then(|| FieldError::new(ROOT_PATH, IssueKind::CrossField, message))
        })
    }

    /// `later` must be strictly after `earlier`.
    ///
    /// Both fields hold RFC 3339 timestamps or `HH:MM` times of day. Skipped when
    /// either field is absent.
    pub fn ordered_after(
        earlier: &'static str,
        later: &'static str,
        message: &'static str,
    ) -> Self {
        Self::new("ordered_after", move |object| {
            let start = object.get(earlier).and_then(Value::as_str)?;
            let end = object.get(later).and_then(Value::as_str)?;
            match compare_instants(start, end) {
                Some(std::cmp::Ordering::Less) | None => None,
                Some(_) => Some(FieldError::new(later, IssueKind::CrossField, message)),
            }
        })
    }

    /// `b` must equal `a` when both are present; error is reported on `b`
    pub fn fields_equal(a: &'static str, b: &'static str, message: &'static str) -> Self {
        Self::new("fields_equal", move |object| match (object.get(a), object.get(b)) {
            (Some(left), Some(right)) if left != right => {
                Some(FieldError::new(b, IssueKind::CrossField, message))
            }
            _ => None,
        })
    }

    /// `b` must differ from `a` when both are present; error is reported on `b`
    pub fn fields_differ(a: &'static str, b: &'static str, message: &'static str) -> Self {
        Self::new("fields_differ", move |object| match (object.get(a), object.get(b)) {
            (Some(left), Some(right)) if left == right => {
                Some(FieldError::new(b, IssueKind::CrossField, message))
            }
            _ => None,
        })
    }

    fn run(&self, object: &Map<String, Value>) -> Option<FieldError> {
        (self.check)(object)
    }
}

/// Orders two timestamps, or two times of day. `None` when they are not comparable.
fn compare_instants(start: &str, end: &str) -> Option<std::cmp::Ordering> {
    if let (Some(s), Some(e)) = (parse_datetime(start), parse_datetime(end)) {
        return Some(s.cmp(&e));
    }
    Some(minutes_of_day(start)?.cmp(&minutes_of_day(end)?))
}

fn minutes_of_day(s: &str) -> Option<u32> {
    if !TIME_OF_DAY_PATTERN.is_match(s) {
        return None;
    }
    let (hours, minutes) = s.split_once(':')?;
    Some(hours.parse::<u32>().ok()? * 60 + minutes.parse::<u32>().ok()?)
}

// ============================================================================
// OBJECT SCHEMA
// ============================================================================

/// Handling of keys that no field declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Drop them from the narrowed value
    #[default]
    Strip,
    /// Report each as an error
    Reject,
}

/// Ordered field table plus cross-field refinements
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    pub fields: IndexMap<String, FieldDef>,
    pub refinements: Vec<Refinement>,
    pub unknown_keys: UnknownKeys,
    pub description: Option<String>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }

    pub fn refine(mut self, refinement: Refinement) -> Self {
        self.refinements.push(refinement);
        self
    }

    pub fn unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown_keys = policy;
        self
    }

    /// Reject undeclared keys instead of stripping them
    pub fn strict(self) -> Self {
        self.unknown_keys(UnknownKeys::Reject)
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    pub fn required_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, def)| def.required)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Same schema with every top-level field optional; rules and refinements kept
    pub fn partial(&self) -> Self {
        let mut derived = self.clone();
        for def in derived.fields.values_mut() {
            def.required = false;
        }
        derived
    }

    pub(crate) fn check_at(&self, path: &str, value: &Value) -> Result<Value, ValidationErrors> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(ValidationErrors::single(FieldError::new(
                    path,
                    IssueKind::InvalidType,
                    format!("Expected object, received {}", json_type_name(other)),
                )));
            }
        };

        let mut errors: Vec<FieldError> = Vec::new();
        let mut narrowed = Map::new();

        for (name, def) in &self.fields {
            let field_path = join_path(path, name);
            match object.get(name) {
                Some(raw) => match def.check(&field_path, raw) {
                    Ok(v) => {
                        narrowed.insert(name.clone(), v);
                    }
                    Err(e) => errors.extend(e),
                },
                None if def.required => errors.push(FieldError::required(field_path)),
                None => {}
            }
        }

        if self.unknown_keys == UnknownKeys::Reject {
            for key in object.keys().filter(|k| !self.fields.contains_key(k.as_str())) {
                errors.push(FieldError::new(
                    join_path(path, key),
                    IssueKind::UnrecognizedKey,
                    "Unrecognized key",
                ));
            }
        }

        if !errors.is_empty() {
            return Err(ValidationErrors::new(errors));
        }

        let refinement_errors: Vec<FieldError> = self
            .refinements
            .iter()
            .filter_map(|r| r.run(&narrowed))
            .collect();
        if !refinement_errors.is_empty() {
            return Err(ValidationErrors::new(refinement_errors).nest_under(path));
        }

        Ok(Value::Object(narrowed))
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Any validatable shape: an object, or a single scalar or array value
#[derive(Debug, Clone)]
pub enum Schema {
    Object(ObjectSchema),
    Field(FieldDef),
}

impl Schema {
    /// Validate `input`, returning the narrowed value. Pure and total.
    pub fn parse(&self, input: &Value) -> Result<Value, ValidationErrors> {
        match self {
            Schema::Object(object) => object.check_at(ROOT_PATH, input),
            Schema::Field(def) => def.check(ROOT_PATH, input),
        }
    }

    /// Derive the PATCH-style variant where every field is optional.
    ///
    /// A non-object schema has no fields to relax and comes back unchanged.
    /// Use [`Schema::try_partial`] to treat that case as a caller mistake.
    pub fn partial(&self) -> Schema {
        match self {
            Schema::Object(object) => Schema::Object(object.partial()),
            Schema::Field(def) => {
                tracing::debug!(
                    schema_type = def.field_type.name(),
                    "partial derivation of a non-object schema returns it unchanged"
                );
                self.clone()
            }
        }
    }

    pub fn try_partial(&self) -> SchemaResult<Schema> {
        match self {
            Schema::Object(object) => Ok(Schema::Object(object.partial())),
            Schema::Field(def) => Err(SchemaError::PartialOfNonObject {
                type_name: def.field_type.name(),
            }),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::Object(_) => "object",
            Schema::Field(def) => def.field_type.name(),
        }
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Schema::Object(object) => Some(object),
            Schema::Field(_) => None,
        }
    }

    /// Same schema under a different unknown-key policy (objects only)
    pub fn with_unknown_keys(self, policy: UnknownKeys) -> Schema {
        match self {
            Schema::Object(object) => Schema::Object(object.unknown_keys(policy)),
            field => field,
        }
    }
}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Self {
        Schema::Object(object)
    }
}

impl From<FieldDef> for Schema {
    fn from(def: FieldDef) -> Self {
        Schema::Field(def)
    }
}

// ============================================================================
// TYPED SCHEMA
// ============================================================================

/// A [`Schema`] whose narrowed value deserializes into `T`
pub struct TypedSchema<T> {
    schema: Schema,
    _target: PhantomData<fn() -> T>,
}

impl<T> Clone for TypedSchema<T> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            _target: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TypedSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedSchema")
            .field("schema", &self.schema)
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned> TypedSchema<T> {
    pub fn new(schema: impl Into<Schema>) -> Self {
        Self {
            schema: schema.into(),
            _target: PhantomData,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn into_schema(self) -> Schema {
        self.schema
    }

    /// Validate the raw JSON without narrowing to `T`
    pub fn parse_value(&self, input: &Value) -> Result<Value, ValidationErrors> {
        self.schema.parse(input)
    }

    /// Validate and narrow to `T`
    pub fn parse(&self, input: &Value) -> Result<T, ValidationErrors> {
        let narrowed = self.schema.parse(input)?;
        serde_json::from_value(narrowed).map_err(|e| {
            // A schema that accepts values its target type cannot hold is a
            // definition bug; surface it as a form-level failure.
            tracing::error!(
                target_type = std::any::type_name::<T>(),
                error = %e,
                "validated value did not deserialize into its target type"
            );
            ValidationErrors::single(FieldError::new(
                ROOT_PATH,
                IssueKind::InvalidType,
                format!("Invalid input: {}", e),
            ))
        })
    }

    /// Untyped partial variant; the narrowed type of a partial shape differs from `T`
    pub fn partial(&self) -> Schema {
        self.schema.partial()
    }

    pub fn with_unknown_keys(self, policy: UnknownKeys) -> Self {
        Self {
            schema: self.schema.with_unknown_keys(policy),
            _target: PhantomData,
        }
    }
}

/// Uniform entry point: validate `input` and wrap the result
pub fn validate<T: DeserializeOwned>(schema: &TypedSchema<T>, input: &Value) -> ValidationOutcome<T> {
    schema.parse(input).into()
}
