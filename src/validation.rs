use regex::Regex;
use std::sync::OnceLock;

use crate::{
    error::ApiError,
    models::{
        CreateBlogPostInput, CreateLeadInput, CreateServiceInput, CreateUserInput, Page,
        Pagination, UpdateBlogPostInput, UpdateLeadInput, UpdateServiceInput, UpdateUserRoleInput,
    },
};

/// Largest page a caller may request.
pub const MAX_TAKE: i64 = 100;

static SLUG_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn slug_regex() -> &'static Regex {
    SLUG_RE.get_or_init(|| {
        Regex::new("^[a-z0-9-]+$")
            .unwrap_or_else(|error| panic!("slug regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validate
///
/// Constraint checks run on operation inputs before they reach a lifecycle
/// service. Patch inputs only check the fields that are present.
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

fn min_chars(field: &str, value: &str, min: usize) -> Result<(), ApiError> {
    if value.chars().count() < min {
        return Err(ApiError::validation(
            field,
            format!("{field} must be at least {min} characters"),
        ));
    }
    Ok(())
}

fn slug(field: &str, value: &str) -> Result<(), ApiError> {
    if !slug_regex().is_match(value) {
        return Err(ApiError::validation(
            field,
            format!("{field} may only contain lowercase letters, digits and hyphens"),
        ));
    }
    Ok(())
}

fn non_negative(field: &str, value: Option<i32>) -> Result<(), ApiError> {
    match value {
        Some(v) if v < 0 => Err(ApiError::validation(field, format!("{field} must be >= 0"))),
        _ => Ok(()),
    }
}

fn json_object(field: &str, value: Option<&serde_json::Value>) -> Result<(), ApiError> {
    match value {
        Some(v) if !v.is_object() => Err(ApiError::validation(
            field,
            format!("{field} must be a JSON object"),
        )),
        _ => Ok(()),
    }
}

fn email(field: &str, value: &str) -> Result<(), ApiError> {
    if !email_regex().is_match(value) {
        return Err(ApiError::validation(field, "invalid email address"));
    }
    Ok(())
}

impl Validate for CreateServiceInput {
    fn validate(&self) -> Result<(), ApiError> {
        min_chars("name", &self.name, 2)?;
        slug("slug", &self.slug)?;
        min_chars("description", &self.description, 10)?;
        non_negative("order", self.order)?;
        non_negative("startingPrice", self.starting_price)
    }
}

impl Validate for UpdateServiceInput {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            min_chars("name", name, 2)?;
        }
        if let Some(value) = &self.slug {
            slug("slug", value)?;
        }
        if let Some(description) = &self.description {
            min_chars("description", description, 10)?;
        }
        non_negative("order", self.order)?;
        non_negative("startingPrice", self.starting_price)
    }
}

impl Validate for CreateBlogPostInput {
    fn validate(&self) -> Result<(), ApiError> {
        min_chars("title", &self.title, 3)?;
        slug("slug", &self.slug)?;
        min_chars("content", &self.content, 10)?;
        json_object("seoMetadata", self.seo_metadata.as_ref())
    }
}

impl Validate for UpdateBlogPostInput {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            min_chars("title", title, 3)?;
        }
        if let Some(value) = &self.slug {
            slug("slug", value)?;
        }
        if let Some(content) = &self.content {
            min_chars("content", content, 10)?;
        }
        json_object("seoMetadata", self.seo_metadata.as_ref())
    }
}

impl Validate for CreateLeadInput {
    fn validate(&self) -> Result<(), ApiError> {
        min_chars("name", &self.name, 2)?;
        email("email", &self.email)?;
        min_chars("message", &self.message, 10)
    }
}

// Status is checked by deserialization; notes and company are free text.
impl Validate for UpdateLeadInput {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

impl Validate for CreateUserInput {
    fn validate(&self) -> Result<(), ApiError> {
        if self.clerk_user_id.trim().is_empty() {
            return Err(ApiError::validation("clerkUserId", "clerkUserId is required"));
        }
        Ok(())
    }
}

impl Validate for UpdateUserRoleInput {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Resolves a caller pagination object into a store page.
///
/// `None` stays `None` (unbounded). A missing `take` uses `default_take`,
/// a missing `skip` is 0. Out-of-range values are rejected, not clamped.
pub fn resolve_page(
    pagination: Option<Pagination>,
    default_take: i64,
) -> Result<Option<Page>, ApiError> {
    let Some(pagination) = pagination else {
        return Ok(None);
    };

    let take = pagination.take.unwrap_or(default_take);
    if !(1..=MAX_TAKE).contains(&take) {
        return Err(ApiError::validation(
            "take",
            format!("take must be between 1 and {MAX_TAKE}"),
        ));
    }

    let skip = pagination.skip.unwrap_or(0);
    if skip < 0 {
        return Err(ApiError::validation("skip", "skip must be >= 0"));
    }

    Ok(Some(Page { take, skip }))
}
