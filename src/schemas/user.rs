//! Account schemas: registration, profile update, login and password change.

use crate::schemas::enums::Role;
use crate::schemas::update_of;
use crate::validation::constants::{USERNAME_PATTERN, user as limits};
use crate::validation::{FieldDef, ObjectSchema, Refinement, TypedSchema};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const USERNAME_CHARSET_MESSAGE: &str =
    "Username can only contain letters, numbers, and underscores";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const PASSWORD_UNCHANGED: &str = "New password must be different from current password";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Daily study goal in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_goal: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_goal: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

fn email() -> FieldDef {
    FieldDef::string().email().max_length(limits::EMAIL_MAX)
}

fn username() -> FieldDef {
    FieldDef::string()
        .length(limits::USERNAME_MIN, limits::USERNAME_MAX)
        .pattern(&USERNAME_PATTERN, USERNAME_CHARSET_MESSAGE)
}

fn new_password() -> FieldDef {
    FieldDef::string().length(limits::PASSWORD_MIN, limits::PASSWORD_MAX)
}

/// Profile fields shared by registration and update
fn profile() -> ObjectSchema {
    ObjectSchema::new()
        .field("email", email())
        .field("username", username())
        .field("firstName", FieldDef::string().max_length(limits::NAME_MAX).optional())
        .field("lastName", FieldDef::string().max_length(limits::NAME_MAX).optional())
        .field("bio", FieldDef::string().max_length(limits::BIO_MAX).optional())
        .field(
            "dailyGoal",
            FieldDef::integer()
                .range(limits::DAILY_GOAL_MIN, limits::DAILY_GOAL_MAX)
                .optional(),
        )
        .field("role", FieldDef::enumeration::<Role>().optional())
}

pub fn create() -> TypedSchema<CreateUser> {
    let base = profile();
    let mut schema = ObjectSchema::new();
    for (name, def) in base.fields {
        schema = schema.field(name.clone(), def);
        if name == "username" {
            schema = schema.field("password", new_password());
        }
    }
    TypedSchema::new(schema.description("Register a new account"))
}

pub fn update() -> TypedSchema<UpdateUser> {
    TypedSchema::new(update_of(profile()).description("Update profile fields of an account"))
}

pub fn login() -> TypedSchema<Login> {
    TypedSchema::new(
        ObjectSchema::new()
            .field("email", FieldDef::string().email())
            .field(
                "password",
                FieldDef::string()
                    .min_length(1)
                    .message("Password is required")
                    .max_length(limits::PASSWORD_MAX),
            )
            .description("Sign in with email and password"),
    )
}

pub fn change_password() -> TypedSchema<ChangePassword> {
    TypedSchema::new(
        ObjectSchema::new()
            .field(
                "currentPassword",
                FieldDef::string()
                    .min_length(1)
                    .message("Current password is required")
                    .max_length(limits::PASSWORD_MAX),
            )
            .field("newPassword", new_password())
            .field("confirmPassword", new_password())
            .refine(Refinement::fields_equal(
                "newPassword",
                "confirmPassword",
                PASSWORDS_DO_NOT_MATCH,
            ))
            .refine(Refinement::fields_differ(
                "currentPassword",
                "newPassword",
                PASSWORD_UNCHANGED,
            ))
            .description("Change the password of the signed-in account"),
    )
}
