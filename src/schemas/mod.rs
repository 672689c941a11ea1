//! Domain input schemas, one namespace per entity family.
//!
//! Each shape is exposed as a function returning a [`TypedSchema`] whose
//! narrowed type is the matching struct, for example
//! `schemas::user::create()` → `TypedSchema<user::CreateUser>`.
//!
//! [`TypedSchema`]: crate::validation::TypedSchema

pub mod community;
pub mod enums;
pub mod learning;
pub mod settings;
pub mod skill;
pub mod user;

use crate::validation::{FieldDef, ObjectSchema, Refinement};

/// Message of the refinement that rejects updates carrying only an identifier
pub const NO_FIELDS_TO_UPDATE: &str = "No fields to update";

/// Update shape derived from a create shape: a required `id`, every other
/// field optional, and at least one of them present.
pub(crate) fn update_of(base: ObjectSchema) -> ObjectSchema {
    keyed_update_of("id", &["id"], base)
}

/// Update shape keyed by `key` instead of `id`
pub(crate) fn keyed_update_of(
    key: &'static str,
    excluded: &'static [&'static str],
    base: ObjectSchema,
) -> ObjectSchema {
    let relaxed = base.partial();
    let mut update = ObjectSchema::new().field(key, FieldDef::id());
    for (name, def) in relaxed.fields {
        update = update.field(name, def);
    }
    for refinement in relaxed.refinements {
        update = update.refine(refinement);
    }
    update.refine(Refinement::at_least_one_besides(excluded, NO_FIELDS_TO_UPDATE))
}
