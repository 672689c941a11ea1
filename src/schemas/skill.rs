//! Skill catalogue entries and a learner's progress in a skill.

use crate::schemas::enums::{Difficulty, SkillLevel};
use crate::schemas::update_of;
use crate::validation::constants::skill as limits;
use crate::validation::{FieldDef, ObjectSchema, TypedSchema};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSkill {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSkill {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserSkill {
    pub user_id: String,
    pub skill_id: String,
    pub level: SkillLevel,
    pub experience: i64,
    /// Percentage towards the next level, 0 to 100
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_level: Option<SkillLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserSkill {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<SkillLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_level: Option<SkillLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_date: Option<DateTime<Utc>>,
}

fn skill_fields() -> ObjectSchema {
    ObjectSchema::new()
        .field("name", FieldDef::string().length(limits::NAME_MIN, limits::NAME_MAX))
        .field(
            "description",
            FieldDef::string().max_length(limits::DESCRIPTION_MAX).optional(),
        )
        .field(
            "category",
            FieldDef::string().length(limits::CATEGORY_MIN, limits::CATEGORY_MAX),
        )
        .field("difficulty", FieldDef::enumeration::<Difficulty>())
}

/// Progress fields of a user-skill link, without the two identifiers
fn progress_fields() -> ObjectSchema {
    ObjectSchema::new()
        .field("level", FieldDef::enumeration::<SkillLevel>())
        .field("experience", FieldDef::integer().min(limits::EXPERIENCE_MIN))
        .field(
            "progress",
            FieldDef::decimal().range(limits::PROGRESS_MIN, limits::PROGRESS_MAX),
        )
        .field("goalLevel", FieldDef::enumeration::<SkillLevel>().optional())
        .field("goalDate", FieldDef::datetime_string().optional())
}

pub fn create() -> TypedSchema<CreateSkill> {
    TypedSchema::new(skill_fields().description("Add a skill to the catalogue"))
}

pub fn update() -> TypedSchema<UpdateSkill> {
    TypedSchema::new(update_of(skill_fields()).description("Edit a catalogue skill"))
}

pub fn create_user_skill() -> TypedSchema<CreateUserSkill> {
    let mut schema = ObjectSchema::new()
        .field("userId", FieldDef::id())
        .field("skillId", FieldDef::id());
    for (name, def) in progress_fields().fields {
        schema = schema.field(name, def);
    }
    TypedSchema::new(schema.description("Start tracking a skill for a learner"))
}

pub fn update_user_skill() -> TypedSchema<UpdateUserSkill> {
    TypedSchema::new(update_of(progress_fields()).description("Record progress in a tracked skill"))
}
