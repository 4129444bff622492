use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::i18n::{Localizable, Overlay, Translations};

// --- Catalogue ---

/// Service
///
/// A catalogue entry shown on the marketing site. `order` drives the display
/// position; `starting_price` is kept in minor currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub icon: Option<String>,
    pub order: i32,
    pub is_active: bool,
    pub starting_price: Option<i32>,
    #[schema(value_type = Option<Object>)]
    #[ts(type = "Record<string, { name?: string, description?: string }> | null")]
    pub translations: Option<Translations<ServiceTranslation>>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Overlay for the translatable fields of a [`Service`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ServiceTranslation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Overlay for ServiceTranslation {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => self.name.as_deref(),
            "description" => self.description.as_deref(),
            _ => None,
        }
    }
}

impl Localizable for Service {
    type Overlay = ServiceTranslation;

    const TRANSLATABLE_FIELDS: &'static [&'static str] = &["name", "description"];

    fn home_field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            _ => None,
        }
    }

    fn set_home_field(&mut self, field: &str, value: String) {
        match field {
            "name" => self.name = value,
            "description" => self.description = value,
            _ => {}
        }
    }

    fn translations(&self) -> Option<&Translations<ServiceTranslation>> {
        self.translations.as_ref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct CreateServiceInput {
    pub name: String,
    pub slug: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub starting_price: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    #[ts(type = "Record<string, { name?: string, description?: string }> | null")]
    pub translations: Option<Translations<ServiceTranslation>>,
}

/// UpdateServiceInput
///
/// Patch payload: only the fields that are present are applied.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct UpdateServiceInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_price: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    #[ts(type = "Record<string, { name?: string, description?: string }> | null")]
    pub translations: Option<Translations<ServiceTranslation>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct ServiceFilter {
    #[serde(default)]
    pub is_active: Option<bool>,
}

// --- Blog ---

/// BlogPost
///
/// `published_at` is stamped the first time the post goes live and is kept
/// even if the post is later unpublished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BlogPost {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    #[schema(value_type = Option<Object>)]
    #[ts(type = "Record<string, unknown> | null")]
    pub seo_metadata: Option<serde_json::Value>,
    pub is_published: bool,
    #[ts(type = "string | null")]
    pub published_at: Option<DateTime<Utc>>,
    #[schema(value_type = Option<Object>)]
    #[ts(type = "Record<string, { title?: string, excerpt?: string, content?: string }> | null")]
    pub translations: Option<Translations<BlogPostTranslation>>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct BlogPostTranslation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Overlay for BlogPostTranslation {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => self.title.as_deref(),
            "excerpt" => self.excerpt.as_deref(),
            "content" => self.content.as_deref(),
            _ => None,
        }
    }
}

impl Localizable for BlogPost {
    type Overlay = BlogPostTranslation;

    const TRANSLATABLE_FIELDS: &'static [&'static str] = &["title", "excerpt", "content"];

    fn home_field(&self, field: &str) -> Option<&str> {
        match field {
            "title" => Some(&self.title),
            "excerpt" => self.excerpt.as_deref(),
            "content" => Some(&self.content),
            _ => None,
        }
    }

    fn set_home_field(&mut self, field: &str, value: String) {
        match field {
            "title" => self.title = value,
            "excerpt" => self.excerpt = Some(value),
            "content" => self.content = value,
            _ => {}
        }
    }

    fn translations(&self) -> Option<&Translations<BlogPostTranslation>> {
        self.translations.as_ref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct CreateBlogPostInput {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub content: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    #[ts(type = "Record<string, unknown> | null")]
    pub seo_metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    #[ts(type = "Record<string, { title?: string, excerpt?: string, content?: string }> | null")]
    pub translations: Option<Translations<BlogPostTranslation>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct UpdateBlogPostInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    #[ts(type = "Record<string, unknown> | null")]
    pub seo_metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    #[ts(type = "Record<string, { title?: string, excerpt?: string, content?: string }> | null")]
    pub translations: Option<Translations<BlogPostTranslation>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct BlogPostFilter {
    #[serde(default)]
    pub is_published: Option<bool>,
}

// --- Leads ---

/// LeadStatus
///
/// Sales pipeline stage. Any stage may be set by an admin update; there is no
/// enforced transition order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    TS,
    ToSchema,
    sqlx::Type,
    Default,
)]
#[sqlx(type_name = "lead_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Proposal,
    Won,
    Lost,
}

/// Lead
///
/// A contact form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
    pub status: LeadStatus,
    pub notes: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct CreateLeadInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct UpdateLeadInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// LeadFilter
///
/// `status` comes from callers; the creation window is only used internally
/// by the dashboard counters.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct LeadFilter {
    #[serde(default)]
    pub status: Option<LeadStatus>,
    #[serde(skip)]
    #[ts(skip)]
    #[schema(ignore)]
    pub created_from: Option<DateTime<Utc>>,
    #[serde(skip)]
    #[ts(skip)]
    #[schema(ignore)]
    pub created_before: Option<DateTime<Utc>>,
}

// --- Accounts ---

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    TS,
    ToSchema,
    sqlx::Type,
    Default,
)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum UserRole {
    #[default]
    User,
    Admin,
    SuperAdmin,
}

/// User
///
/// Local mirror of an identity-provider account, keyed by `clerk_user_id`.
/// `role` governs in-app permissions and is independent of the role carried
/// in token metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub clerk_user_id: String,
    pub role: UserRole,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct CreateUserInput {
    pub clerk_user_id: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct UpdateUserRoleInput {
    pub role: UserRole,
}

/// Patch applied to a [`User`]; built from [`UpdateUserRoleInput`].
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub role: Option<UserRole>,
}

impl From<UpdateUserRoleInput> for UserPatch {
    fn from(input: UpdateUserRoleInput) -> Self {
        Self {
            role: Some(input.role),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct UserFilter {
    #[serde(default)]
    pub role: Option<UserRole>,
}

// --- Listing ---

/// Pagination
///
/// Caller-supplied paging window. Resolved into a [`Page`] after bounds checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct Pagination {
    #[serde(default)]
    pub take: Option<i64>,
    #[serde(default)]
    pub skip: Option<i64>,
}

/// A validated paging window handed to the store verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub take: i64,
    pub skip: i64,
}

// --- Dashboard & identity (output) ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub total_services: i64,
    pub active_services: i64,
    pub total_blog_posts: i64,
    pub published_blog_posts: i64,
    pub draft_blog_posts: i64,
    pub total_leads: i64,
    pub new_leads: i64,
    pub contacted_leads: i64,
    pub qualified_leads: i64,
    pub leads_this_month: i64,
    pub leads_last_month: i64,
    pub total_users: i64,
}

/// AuthUserView
///
/// The caller's identity as returned by the `me` operation.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AuthUserView {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub role: Option<String>,
}
