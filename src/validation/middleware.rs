//! Logging front end over a shared [`SchemaRegistry`].
//!
//! [`SchemaRegistry`]: crate::validation::SchemaRegistry

use crate::error::SchemaResult;
use crate::logging::validation_span;
use crate::validation::outcome::{ValidationErrors, ValidationOutcome};
use crate::validation::registry::SharedSchemaRegistry;
use anyhow::{Result, anyhow};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

/// Registry front end that logs every validation call
#[derive(Debug, Clone)]
pub struct ValidationMiddleware {
    registry: SharedSchemaRegistry,
}

impl ValidationMiddleware {
    pub fn new(registry: SharedSchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SharedSchemaRegistry {
        &self.registry
    }

    /// Validate a payload against the named schema
    pub fn validate(&self, schema: &str, input: &Value) -> SchemaResult<ValidationOutcome<Value>> {
        let _span = validation_span(schema).entered();
        debug!(schema, "validating input");

        let outcome = self.registry.validate(schema, input).inspect_err(|e| {
            error!(schema, error = %e, "validation requested for unregistered schema");
        })?;

        match &outcome {
            ValidationOutcome::Valid(_) => debug!(schema, "input accepted"),
            ValidationOutcome::Invalid(errors) => warn!(
                schema,
                error_count = errors.len(),
                fields = ?errors.fields(),
                "input rejected"
            ),
        }
        Ok(outcome)
    }

    /// Validate, then deserialize the narrowed value into `T`
    pub fn validate_and_deserialize<T: DeserializeOwned>(&self, schema: &str, input: &Value) -> Result<T> {
        match self.validate(schema, input)? {
            ValidationOutcome::Valid(value) => serde_json::from_value(value)
                .map_err(|e| anyhow!("deserialization failed for schema '{}': {}", schema, e)),
            ValidationOutcome::Invalid(errors) => Err(anyhow!(format_validation_errors(schema, &errors))),
        }
    }
}

/// Numbered, human-readable listing of field errors
pub fn format_validation_errors(schema: &str, errors: &ValidationErrors) -> String {
    let error_list = errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("  {}. {}", i + 1, e))
        .collect::<Vec<_>>()
        .join("\n");

    format!("Schema '{}' validation failed:\n{}", schema, error_list)
}
