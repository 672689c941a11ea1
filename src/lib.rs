//! Input validation for a learning and skills-tracking platform.
//!
//! [`schemas`] declares the payload shapes for accounts, skills, study
//! sessions, projects, goals, communities, posts, reviews and settings.
//! [`validation`] is the engine those declarations run on.

pub mod config;
pub mod error;
pub mod logging;
pub mod schemas;
pub mod validation;

pub use config::{Cli, CliArgs, Command, OutputFormat, ValidatorConfig};
pub use error::{IssueKind, SchemaError, SchemaResult};
pub use logging::{LoggingConfig, init_logging};
pub use validation::{
    FieldError, SchemaRegistry, TypedSchema, ValidationErrors, ValidationMiddleware,
    ValidationOutcome, create_validation_middleware, validate,
};
