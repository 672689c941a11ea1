//! Named schema registry.
//!
//! Callers that receive raw payloads address schemas by a stable identifier
//! such as `user.create` or `settings.notification`. The registry resolves the
//! identifier, validates, and can describe the narrowed type as JSON Schema.

use crate::error::{SchemaError, SchemaResult};
use crate::schemas::{community, learning, settings, skill, user};
use crate::validation::outcome::ValidationOutcome;
use crate::validation::schema::{Schema, TypedSchema, UnknownKeys};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use schemars::{JsonSchema, schema_for};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// A schema registered under an identifier
#[derive(Debug, Clone)]
pub struct RegisteredSchema {
    pub name: &'static str,
    pub description: String,
    pub schema: Schema,
    json_schema: fn() -> Value,
}

impl RegisteredSchema {
    /// JSON Schema of the narrowed type
    pub fn json_schema(&self) -> Value {
        (self.json_schema)()
    }
}

fn json_schema_of<T: JsonSchema>() -> Value {
    serde_json::to_value(schema_for!(T)).unwrap_or_else(|e| {
        tracing::error!(
            target_type = std::any::type_name::<T>(),
            error = %e,
            "failed to serialize generated JSON schema"
        );
        Value::Null
    })
}

/// Registry construction options
#[derive(Debug, Clone, Default)]
pub struct RegistryOptions {
    /// Report undeclared keys instead of stripping them
    pub reject_unknown_keys: bool,
    /// Allow-list of identifiers; `None` registers everything
    pub enabled: Option<HashSet<String>>,
}

impl RegistryOptions {
    fn is_enabled(&self, name: &str) -> bool {
        self.enabled
            .as_ref()
            .map(|set| set.contains(name))
            .unwrap_or(true)
    }
}

/// Schemas by identifier, in registration order
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<&'static str, RegisteredSchema>,
}

/// Registry shared across threads
pub type SharedSchemaRegistry = Arc<SchemaRegistry>;

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `schema` under `name`, replacing any previous entry
    pub fn register<T>(&mut self, name: &'static str, schema: TypedSchema<T>)
    where
        T: DeserializeOwned + JsonSchema,
    {
        let schema = schema.into_schema();
        let description = schema
            .as_object()
            .and_then(|object| object.description.clone())
            .unwrap_or_default();
        self.schemas.insert(
            name,
            RegisteredSchema {
                name,
                description,
                schema,
                json_schema: json_schema_of::<T>,
            },
        );
    }

    pub fn get(&self, name: &str) -> SchemaResult<&RegisteredSchema> {
        self.schemas
            .get(name)
            .ok_or_else(|| SchemaError::UnknownSchema {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemas.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredSchema> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Validate `input` against the schema registered as `name`.
    ///
    /// An unknown identifier is a caller fault and comes back as `Err`; a
    /// malformed input is an ordinary `Invalid` outcome.
    pub fn validate(&self, name: &str, input: &Value) -> SchemaResult<ValidationOutcome<Value>> {
        let entry = self.get(name)?;
        Ok(entry.schema.parse(input).into())
    }

    pub fn json_schema(&self, name: &str) -> SchemaResult<Value> {
        Ok(self.get(name)?.json_schema())
    }
}

/// Builder that applies [`RegistryOptions`] while registering
pub struct SchemaRegistryBuilder {
    registry: SchemaRegistry,
    options: RegistryOptions,
}

impl SchemaRegistryBuilder {
    pub fn new(options: RegistryOptions) -> Self {
        Self {
            registry: SchemaRegistry::new(),
            options,
        }
    }

    pub fn register<T>(mut self, name: &'static str, schema: TypedSchema<T>) -> Self
    where
        T: DeserializeOwned + JsonSchema,
    {
        if !self.options.is_enabled(name) {
            return self;
        }
        let schema = if self.options.reject_unknown_keys {
            schema.with_unknown_keys(UnknownKeys::Reject)
        } else {
            schema
        };
        self.registry.register(name, schema);
        self
    }

    pub fn build(self) -> SchemaRegistry {
        self.registry
    }

    pub fn build_shared(self) -> SharedSchemaRegistry {
        Arc::new(self.registry)
    }
}

/// Registry holding every domain schema permitted by `options`
pub fn create_registry(options: RegistryOptions) -> SchemaRegistry {
    let registry = SchemaRegistryBuilder::new(options)
        // Accounts
        .register("user.create", user::create())
        .register("user.update", user::update())
        .register("user.login", user::login())
        .register("user.change_password", user::change_password())
        // Skills
        .register("skill.create", skill::create())
        .register("skill.update", skill::update())
        .register("user_skill.create", skill::create_user_skill())
        .register("user_skill.update", skill::update_user_skill())
        // Learning
        .register("study_session.create", learning::create_study_session())
        .register("study_session.update", learning::update_study_session())
        .register("project.create", learning::create_project())
        .register("project.update", learning::update_project())
        .register("goal.create", learning::create_goal())
        .register("goal.update", learning::update_goal())
        .register("study_plan.create", learning::create_study_plan())
        // Community
        .register("community.create", community::create())
        .register("community.update", community::update())
        .register("post.create", community::create_post())
        .register("post.update", community::update_post())
        .register("review.create", community::create_review())
        // Settings
        .register("settings.user", settings::user_settings_schema())
        .register("settings.notification", settings::notification())
        .register("settings.privacy", settings::privacy())
        .register("settings.appearance", settings::appearance())
        .register("settings.security", settings::security())
        .register("settings.learning_preferences", settings::learning_preferences_schema())
        .register("settings.update", settings::update())
        .build();

    tracing::debug!(schemas = registry.len(), "schema registry built");
    registry
}

/// Registry with every schema and default options
pub static DEFAULT_REGISTRY: Lazy<SchemaRegistry> =
    Lazy::new(|| create_registry(RegistryOptions::default()));

/// Every identifier the crate knows, in registration order
pub fn schema_names() -> Vec<&'static str> {
    DEFAULT_REGISTRY.names().collect()
}
