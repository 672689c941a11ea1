//! Communities, posts and peer reviews.

use crate::schemas::update_of;
use crate::validation::constants::community as limits;
use crate::validation::{FieldDef, ObjectSchema, TypedSchema};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunity {
    pub owner_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommunity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub community_id: String,
    pub author_id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePost {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Review left by one member for another. Self-review is rejected by the
/// caller, which knows the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReview {
    pub reviewer_id: String,
    pub reviewee_id: String,
    pub title: String,
    pub content: String,
    pub rating: i64,
}

fn community_details() -> ObjectSchema {
    ObjectSchema::new()
        .field("name", FieldDef::string().length(limits::NAME_MIN, limits::NAME_MAX))
        .field(
            "description",
            FieldDef::string().max_length(limits::DESCRIPTION_MAX).optional(),
        )
        .field("isPrivate", FieldDef::boolean().optional())
}

fn post_details() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            "title",
            FieldDef::string().length(limits::POST_TITLE_MIN, limits::POST_TITLE_MAX),
        )
        .field(
            "content",
            FieldDef::string().length(limits::POST_CONTENT_MIN, limits::POST_CONTENT_MAX),
        )
        .field(
            "tags",
            FieldDef::array(FieldDef::string().length(limits::TAG_MIN, limits::TAG_MAX))
                .max_items(limits::POST_TAGS_MAX)
                .optional(),
        )
}

pub fn create() -> TypedSchema<CreateCommunity> {
    let mut schema = ObjectSchema::new().field("ownerId", FieldDef::id());
    for (name, def) in community_details().fields {
        schema = schema.field(name, def);
    }
    TypedSchema::new(schema.description("Found a community"))
}

pub fn update() -> TypedSchema<UpdateCommunity> {
    TypedSchema::new(update_of(community_details()).description("Edit community details"))
}

pub fn create_post() -> TypedSchema<CreatePost> {
    let mut schema = ObjectSchema::new()
        .field("communityId", FieldDef::id())
        .field("authorId", FieldDef::id());
    for (name, def) in post_details().fields {
        schema = schema.field(name, def);
    }
    TypedSchema::new(schema.description("Publish a post in a community"))
}

pub fn update_post() -> TypedSchema<UpdatePost> {
    TypedSchema::new(update_of(post_details()).description("Edit a published post"))
}

pub fn create_review() -> TypedSchema<CreateReview> {
    TypedSchema::new(
        ObjectSchema::new()
            .field("reviewerId", FieldDef::id())
            .field("revieweeId", FieldDef::id())
            .field(
                "title",
                FieldDef::string().length(limits::REVIEW_TITLE_MIN, limits::REVIEW_TITLE_MAX),
            )
            .field(
                "content",
                FieldDef::string().length(limits::REVIEW_CONTENT_MIN, limits::REVIEW_CONTENT_MAX),
            )
            .field(
                "rating",
                FieldDef::integer().range(limits::RATING_MIN, limits::RATING_MAX),
            )
            .description("Review another member"),
    )
}
