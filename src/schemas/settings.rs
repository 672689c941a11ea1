//! Per-user settings sections and the combined settings update.
//!
//! Every settings field is optional: a section payload carries only the values
//! the user changed.

use crate::schemas::enums::{
    DigestFrequency, Difficulty, FontSize, LearningStyle, ProfileVisibility, Theme,
};
use crate::schemas::{NO_FIELDS_TO_UPDATE, keyed_update_of};
use crate::validation::constants::{
    HEX_COLOR_PATTERN, TIME_OF_DAY_PATTERN, learning, settings as limits, user,
};
use crate::validation::{FieldDef, ObjectSchema, Refinement, TypedSchema};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const INVALID_TIME: &str = "Invalid time format (HH:MM)";
pub const INVALID_COLOR: &str = "Invalid color format (#RRGGBB)";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_goal: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuietHours {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_notifications: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_notifications: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest_frequency: Option<DigestFrequency>,
    /// May wrap past midnight, e.g. 22:00 to 07:00
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiet_hours: Option<QuietHours>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_visibility: Option<ProfileVisibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_progress: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_skills: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_messages: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compact_mode: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_factor_enabled: Option<bool>,
    /// Idle timeout in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_alerts: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LearningPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_style: Option<LearningStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_study_time: Option<String>,
    /// Preferred session length in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_goal_hours: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettings {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<PrivacySettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<AppearanceSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<SecuritySettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_preferences: Option<LearningPreferences>,
}

fn time_of_day() -> FieldDef {
    FieldDef::string().pattern(&TIME_OF_DAY_PATTERN, INVALID_TIME)
}

fn user_settings() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            "displayName",
            FieldDef::string()
                .length(limits::DISPLAY_NAME_MIN, limits::DISPLAY_NAME_MAX)
                .optional(),
        )
        .field(
            "timezone",
            FieldDef::string()
                .length(limits::TIMEZONE_MIN, limits::TIMEZONE_MAX)
                .optional(),
        )
        .field(
            "language",
            FieldDef::string()
                .length(limits::LANGUAGE_MIN, limits::LANGUAGE_MAX)
                .optional(),
        )
        .field(
            "dailyGoal",
            FieldDef::integer()
                .range(user::DAILY_GOAL_MIN, user::DAILY_GOAL_MAX)
                .optional(),
        )
}

fn notification_settings() -> ObjectSchema {
    let quiet_hours = ObjectSchema::new()
        .field("start", time_of_day())
        .field("end", time_of_day());

    ObjectSchema::new()
        .field("emailNotifications", FieldDef::boolean().optional())
        .field("pushNotifications", FieldDef::boolean().optional())
        .field("reminderTime", time_of_day().optional())
        .field(
            "digestFrequency",
            FieldDef::enumeration::<DigestFrequency>().optional(),
        )
        .field("quietHours", FieldDef::object(quiet_hours).optional())
}

fn privacy_settings() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            "profileVisibility",
            FieldDef::enumeration::<ProfileVisibility>().optional(),
        )
        .field("showProgress", FieldDef::boolean().optional())
        .field("showSkills", FieldDef::boolean().optional())
        .field("allowMessages", FieldDef::boolean().optional())
}

fn appearance_settings() -> ObjectSchema {
    ObjectSchema::new()
        .field("theme", FieldDef::enumeration::<Theme>().optional())
        .field("fontSize", FieldDef::enumeration::<FontSize>().optional())
        .field(
            "accentColor",
            FieldDef::string()
                .pattern(&HEX_COLOR_PATTERN, INVALID_COLOR)
                .optional(),
        )
        .field("compactMode", FieldDef::boolean().optional())
}

fn security_settings() -> ObjectSchema {
    ObjectSchema::new()
        .field("twoFactorEnabled", FieldDef::boolean().optional())
        .field(
            "sessionTimeout",
            FieldDef::integer()
                .range(limits::SESSION_TIMEOUT_MIN, limits::SESSION_TIMEOUT_MAX)
                .optional(),
        )
        .field("loginAlerts", FieldDef::boolean().optional())
}

fn learning_preferences() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            "learningStyle",
            FieldDef::enumeration::<LearningStyle>().optional(),
        )
        .field("preferredStudyTime", time_of_day().optional())
        .field(
            "sessionLength",
            FieldDef::integer()
                .range(learning::SESSION_DURATION_MIN, learning::SESSION_DURATION_MAX)
                .optional(),
        )
        .field(
            "preferredDifficulty",
            FieldDef::enumeration::<Difficulty>().optional(),
        )
        .field(
            "weeklyGoalHours",
            FieldDef::integer()
                .range(limits::WEEKLY_GOAL_HOURS_MIN, limits::WEEKLY_GOAL_HOURS_MAX)
                .optional(),
        )
}

pub fn user_settings_schema() -> TypedSchema<UserSettings> {
    TypedSchema::new(user_settings().description("General account preferences"))
}

pub fn notification() -> TypedSchema<NotificationSettings> {
    TypedSchema::new(notification_settings().description("Notification preferences"))
}

pub fn privacy() -> TypedSchema<PrivacySettings> {
    TypedSchema::new(privacy_settings().description("Profile visibility preferences"))
}

pub fn appearance() -> TypedSchema<AppearanceSettings> {
    TypedSchema::new(appearance_settings().description("Display preferences"))
}

pub fn security() -> TypedSchema<SecuritySettings> {
    TypedSchema::new(security_settings().description("Account security preferences"))
}

pub fn learning_preferences_schema() -> TypedSchema<LearningPreferences> {
    TypedSchema::new(learning_preferences().description("Study habit preferences"))
}

/// All sections at once, keyed by `userId`
pub fn update() -> TypedSchema<UpdateSettings> {
    // An empty section changes nothing
    let section = |schema: ObjectSchema| {
        FieldDef::object(schema.refine(Refinement::at_least_one_besides(&[], NO_FIELDS_TO_UPDATE)))
    };
    let sections = ObjectSchema::new()
        .field("profile", section(user_settings()))
        .field("notifications", section(notification_settings()))
        .field("privacy", section(privacy_settings()))
        .field("appearance", section(appearance_settings()))
        .field("security", section(security_settings()))
        .field("learningPreferences", section(learning_preferences()));

    TypedSchema::new(
        keyed_update_of("userId", &["userId"], sections)
            .description("Update one or more settings sections"),
    )
}
