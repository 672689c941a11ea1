//! Study sessions, portfolio projects, goals and scheduled study plans.

use crate::schemas::enums::{ProjectStatus, SessionType};
use crate::schemas::update_of;
use crate::validation::constants::learning as limits;
use crate::validation::{FieldDef, ObjectSchema, Refinement, TypedSchema};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const END_BEFORE_START: &str = "End time must be after start time";

// ============================================================================
// Study sessions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudySession {
    pub user_id: String,
    pub skill_id: String,
    /// Minutes
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<i64>,
    pub session_type: SessionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudySession {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_type: Option<SessionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn session_details() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            "duration",
            FieldDef::integer().range(limits::SESSION_DURATION_MIN, limits::SESSION_DURATION_MAX),
        )
        .field(
            "efficiency",
            FieldDef::integer()
                .range(limits::EFFICIENCY_MIN, limits::EFFICIENCY_MAX)
                .optional(),
        )
        .field("sessionType", FieldDef::enumeration::<SessionType>())
        .field(
            "mood",
            FieldDef::integer().range(limits::MOOD_MIN, limits::MOOD_MAX).optional(),
        )
        .field("notes", FieldDef::string().max_length(limits::NOTES_MAX).optional())
}

pub fn create_study_session() -> TypedSchema<CreateStudySession> {
    let mut schema = ObjectSchema::new()
        .field("userId", FieldDef::id())
        .field("skillId", FieldDef::id());
    for (name, def) in session_details().fields {
        schema = schema.field(name, def);
    }
    let schema = schema
        .field("startedAt", FieldDef::datetime_string().optional())
        .description("Log a completed study session");
    TypedSchema::new(schema)
}

pub fn update_study_session() -> TypedSchema<UpdateStudySession> {
    TypedSchema::new(update_of(session_details()).description("Correct a logged study session"))
}

// ============================================================================
// Projects
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub user_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_ids: Option<Vec<String>>,
}

fn title() -> FieldDef {
    FieldDef::string().length(limits::TITLE_MIN, limits::TITLE_MAX)
}

fn description() -> FieldDef {
    FieldDef::string().max_length(limits::DESCRIPTION_MAX).optional()
}

fn project_details() -> ObjectSchema {
    ObjectSchema::new()
        .field("title", title())
        .field("description", description())
        .field("status", FieldDef::enumeration::<ProjectStatus>().optional())
        .field("repository", FieldDef::string().url().optional())
        .field("demoUrl", FieldDef::string().url().optional())
        .field(
            "skillIds",
            FieldDef::array(FieldDef::id())
                .max_items(limits::PROJECT_SKILLS_MAX)
                .optional(),
        )
}

pub fn create_project() -> TypedSchema<CreateProject> {
    let mut schema = ObjectSchema::new().field("userId", FieldDef::id());
    for (name, def) in project_details().fields {
        schema = schema.field(name, def);
    }
    TypedSchema::new(schema.description("Add a portfolio project"))
}

pub fn update_project() -> TypedSchema<UpdateProject> {
    TypedSchema::new(update_of(project_details()).description("Edit a portfolio project"))
}

// ============================================================================
// Goals
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoal {
    pub user_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoal {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

fn goal_details() -> ObjectSchema {
    ObjectSchema::new()
        .field("title", title())
        .field("description", description())
        .field("targetDate", FieldDef::datetime_string())
        .field("skillId", FieldDef::id().optional())
}

pub fn create_goal() -> TypedSchema<CreateGoal> {
    let mut schema = ObjectSchema::new().field("userId", FieldDef::id());
    for (name, def) in goal_details().fields {
        schema = schema.field(name, def);
    }
    TypedSchema::new(schema.description("Set a learning goal"))
}

pub fn update_goal() -> TypedSchema<UpdateGoal> {
    let details = goal_details().field("completed", FieldDef::boolean().optional());
    TypedSchema::new(update_of(details).description("Edit or complete a learning goal"))
}

// ============================================================================
// Study plans
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudyPlan {
    pub user_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

pub fn create_study_plan() -> TypedSchema<CreateStudyPlan> {
    TypedSchema::new(
        ObjectSchema::new()
            .field("userId", FieldDef::id())
            .field("title", title())
            .field("description", description())
            .field("startTime", FieldDef::datetime_string())
            .field("endTime", FieldDef::datetime_string())
            .refine(Refinement::ordered_after("startTime", "endTime", END_BEFORE_START))
            .description("Schedule a study block"),
    )
}
