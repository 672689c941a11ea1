//! Schema validation engine.
//!
//! Turns untyped JSON input into either a narrowed, typed value or an ordered
//! list of field-qualified errors:
//! - field bounds and patterns live in [`constants`]
//! - [`FieldDef`] and [`ObjectSchema`] describe input shapes declaratively
//! - [`TypedSchema`] narrows validated JSON into a serde type
//! - [`SchemaRegistry`] resolves schemas by identifier for untyped callers
//! - [`guards`] holds precondition checks for already-trusted values
//!
//! Validation is pure and synchronous. Malformed input is an ordinary return
//! value, never an `Err` of [`SchemaError`] and never a panic.
//!
//! # Usage
//!
//! ```
//! use skilltrack_schema::schemas::learning;
//! use skilltrack_schema::validation::{ValidationOutcome, validate};
//! use serde_json::json;
//!
//! let input = json!({
//!     "userId": "cjld2cjxh0000qzrmn831i7rn",
//!     "title": "Evening review",
//!     "startTime": "2025-03-01T18:00:00Z",
//!     "endTime": "2025-03-01T17:00:00Z",
//! });
//!
//! match validate(&learning::create_study_plan(), &input) {
//!     ValidationOutcome::Valid(plan) => println!("scheduled {}", plan.title),
//!     ValidationOutcome::Invalid(errors) => {
//!         assert_eq!(errors.fields(), vec!["endTime"]);
//!     }
//! }
//! ```
//!
//! [`SchemaError`]: crate::error::SchemaError

pub mod constants;
pub mod guards;
pub mod middleware;
pub mod outcome;
pub mod registry;
pub mod rules;
pub mod schema;

pub use guards::{
    PreconditionError, PreconditionResult, parse_or, parse_or_else, require_email, require_id,
    require_number_in_range, require_password,
};
pub use middleware::{ValidationMiddleware, format_validation_errors};
pub use outcome::{FieldError, ROOT_PATH, ValidationErrors, ValidationOutcome};
pub use registry::{
    DEFAULT_REGISTRY, RegisteredSchema, RegistryOptions, SchemaRegistry, SchemaRegistryBuilder,
    SharedSchemaRegistry, create_registry, schema_names,
};
pub use rules::{FieldDef, FieldType, ValidationRule};
pub use schema::{ObjectSchema, Refinement, Schema, TypedSchema, UnknownKeys, validate};

use std::sync::Arc;

/// Middleware over a freshly built registry
pub fn create_validation_middleware(options: RegistryOptions) -> ValidationMiddleware {
    ValidationMiddleware::new(Arc::new(create_registry(options)))
}
