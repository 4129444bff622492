use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ErrorEntry, OperationFailure},
    guard::RequestContext,
    i18n::{Locale, LocaleSettings, Localizable},
    models::{
        BlogPost, BlogPostFilter, CreateBlogPostInput, CreateLeadInput, CreateServiceInput,
        CreateUserInput, LeadFilter, LeadStatus, Pagination, Service, ServiceFilter,
        UpdateBlogPostInput, UpdateLeadInput, UpdateServiceInput, UpdateUserRoleInput,
        UserFilter, UserRole,
    },
    validation::Validate,
};

// --- Envelope ---

/// OperationRequest
///
/// Body of `POST /api/operations`: the operation name, its variables and an
/// optional display locale.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OperationRequest {
    pub operation: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    #[ts(type = "Record<string, unknown>")]
    pub variables: Value,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct OperationResponse {
    #[schema(value_type = Object)]
    #[ts(type = "unknown")]
    pub data: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorEntry>,
}

/// Operation variables with typed, field-attributed extraction.
struct Variables(Map<String, Value>);

impl Variables {
    fn from_value(value: Value) -> Result<Self, ApiError> {
        match value {
            Value::Null => Ok(Self(Map::new())),
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ApiError::validation("variables", "variables must be an object")),
        }
    }

    /// A missing variable or an explicit `null` both count as absent.
    fn optional<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, ApiError> {
        match self.0.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| ApiError::validation(name, format!("invalid {name}: {e}"))),
        }
    }

    fn required<T: DeserializeOwned>(&self, name: &str) -> Result<T, ApiError> {
        self.optional(name)?
            .ok_or_else(|| ApiError::validation(name, format!("{name} is required")))
    }

    fn id(&self) -> Result<Uuid, ApiError> {
        self.required("id")
    }

    /// Deserializes and validates the `input` variable.
    fn input<T: DeserializeOwned + Validate>(&self) -> Result<T, ApiError> {
        let input: T = self.required("input")?;
        input.validate()?;
        Ok(input)
    }
}

fn to_data<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::internal(format!("failed to encode result: {e}")))
}

/// Applies the request locale, if any, to a localizable record.
fn present<E: Localizable>(ctx: &RequestContext, entity: E) -> E {
    match &ctx.locale {
        Some(settings) => settings.apply(&entity),
        None => entity,
    }
}

fn present_all<E: Localizable>(ctx: &RequestContext, entities: Vec<E>) -> Vec<E> {
    entities.into_iter().map(|e| present(ctx, e)).collect()
}

// --- Handlers ---

/// execute_operation
///
/// Single entry point for every named operation:
/// 1. Look the operation up in the table (`UNKNOWN_OPERATION` if absent).
/// 2. Run the access guard. Nothing below runs for a rejected call.
/// 3. Resolve the display locale.
/// 4. Dispatch to the lifecycle services and render the result.
#[utoipa::path(
    post,
    path = "/api/operations",
    request_body = OperationRequest,
    responses(
        (status = 200, description = "Operation result", body = OperationResponse),
        (status = 400, description = "Validation failed or unknown operation", body = OperationResponse),
        (status = 401, description = "Unauthenticated", body = OperationResponse),
        (status = 403, description = "Forbidden", body = OperationResponse),
        (status = 404, description = "Not found", body = OperationResponse),
        (status = 409, description = "Conflict", body = OperationResponse)
    )
)]
pub async fn execute_operation(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<OperationRequest>, JsonRejection>,
) -> Result<Json<OperationResponse>, OperationFailure> {
    let Json(request) = payload.map_err(|rejection| OperationFailure {
        operation: String::new(),
        error: ApiError::ValidationFailed {
            message: rejection.body_text(),
            field: None,
        },
    })?;

    let operation = request.operation.clone();
    let fail = |error: ApiError| OperationFailure {
        operation: operation.clone(),
        error,
    };

    let descriptor = state
        .operations
        .get(&request.operation)
        .ok_or_else(|| fail(ApiError::UnknownOperation(request.operation.clone())))?;

    let mut ctx = state
        .guard
        .admit(descriptor, &headers)
        .await
        .map_err(&fail)?;

    if let Some(raw) = request.locale.as_deref() {
        let requested = raw
            .parse::<Locale>()
            .map_err(|e| fail(ApiError::validation("locale", e.to_string())))?;
        ctx.locale = Some(LocaleSettings {
            requested,
            fallback: state.config.fallback_locale,
        });
    }

    let variables = Variables::from_value(request.variables).map_err(&fail)?;
    let data = dispatch(&state, descriptor.name(), &variables, &ctx)
        .await
        .map_err(&fail)?;

    Ok(Json(OperationResponse {
        data,
        errors: Vec::new(),
    }))
}

/// health
///
/// Liveness probe for load balancers. Outside the operation table.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}

// --- Dispatch ---

async fn dispatch(
    state: &AppState,
    operation: &str,
    vars: &Variables,
    ctx: &RequestContext,
) -> Result<Value, ApiError> {
    match operation {
        "health" => to_data("OK"),
        "me" => {
            let identity = ctx
                .identity
                .as_ref()
                .ok_or_else(|| ApiError::unauthenticated("authentication required"))?;
            to_data(identity.view())
        }
        "dashboardStats" => to_data(state.dashboard.stats().await?),
        "services" | "service" | "serviceBySlug" | "servicesCount" | "createService"
        | "updateService" | "deleteService" => catalog(state, operation, vars, ctx).await,
        "blogPosts" | "blogPostBySlug" | "blogPostsCount" | "adminBlogPosts" | "adminBlogPost"
        | "adminBlogPostBySlug" | "adminBlogPostsCount" | "createBlogPost" | "updateBlogPost"
        | "deleteBlogPost" => blog(state, operation, vars, ctx).await,
        "createLead" | "leads" | "lead" | "leadsCount" | "updateLead" | "deleteLead" => {
            leads(state, operation, vars).await
        }
        "users" | "user" | "userByClerkId" | "usersCount" | "createUser" | "updateUserRole"
        | "deleteUser" => accounts(state, operation, vars).await,
        other => Err(ApiError::UnknownOperation(other.to_string())),
    }
}

async fn catalog(
    state: &AppState,
    operation: &str,
    vars: &Variables,
    ctx: &RequestContext,
) -> Result<Value, ApiError> {
    let catalog = &state.catalog;
    match operation {
        "services" => {
            let filter: ServiceFilter = vars.optional("where")?.unwrap_or_default();
            let services = catalog.find_all(&filter, None).await?;
            to_data(present_all(ctx, services))
        }
        "service" => {
            let service = catalog.find_by_id(vars.id()?).await?;
            to_data(service.map(|s| present(ctx, s)))
        }
        "serviceBySlug" => {
            let slug: String = vars.required("slug")?;
            let service = catalog.find_by_key(&slug).await?;
            to_data(service.map(|s| present(ctx, s)))
        }
        "servicesCount" => {
            let filter = ServiceFilter {
                is_active: vars.optional("isActive")?,
            };
            to_data(catalog.count(&filter).await?)
        }
        "createService" => {
            let input: CreateServiceInput = vars.input()?;
            to_data(present::<Service>(ctx, catalog.create(input).await?))
        }
        "updateService" => {
            let id = vars.id()?;
            let input: UpdateServiceInput = vars.input()?;
            to_data(present::<Service>(ctx, catalog.update(id, input).await?))
        }
        "deleteService" => to_data(present::<Service>(ctx, catalog.delete(vars.id()?).await?)),
        other => Err(ApiError::UnknownOperation(other.to_string())),
    }
}

async fn blog(
    state: &AppState,
    operation: &str,
    vars: &Variables,
    ctx: &RequestContext,
) -> Result<Value, ApiError> {
    let blog = &state.blog;
    let published = BlogPostFilter {
        is_published: Some(true),
    };
    match operation {
        "blogPosts" => {
            let pagination: Option<Pagination> = vars.optional("pagination")?;
            let posts = blog.find_all(&published, pagination).await?;
            to_data(present_all(ctx, posts))
        }
        "blogPostBySlug" => {
            let slug: String = vars.required("slug")?;
            let post = blog.find_by_key(&slug).await?.filter(|p| p.is_published);
            to_data(post.map(|p| present(ctx, p)))
        }
        "blogPostsCount" => to_data(blog.count(&published).await?),
        "adminBlogPosts" => {
            let pagination: Option<Pagination> = vars.optional("pagination")?;
            let posts = blog.find_all(&BlogPostFilter::default(), pagination).await?;
            to_data(present_all(ctx, posts))
        }
        "adminBlogPost" => {
            let post = blog.find_by_id(vars.id()?).await?;
            to_data(post.map(|p| present(ctx, p)))
        }
        "adminBlogPostBySlug" => {
            let slug: String = vars.required("slug")?;
            let post = blog.find_by_key(&slug).await?;
            to_data(post.map(|p| present(ctx, p)))
        }
        "adminBlogPostsCount" => {
            let filter = BlogPostFilter {
                is_published: vars.optional("isPublished")?,
            };
            to_data(blog.count(&filter).await?)
        }
        "createBlogPost" => {
            let input: CreateBlogPostInput = vars.input()?;
            to_data(present::<BlogPost>(ctx, blog.create(input).await?))
        }
        "updateBlogPost" => {
            let id = vars.id()?;
            let input: UpdateBlogPostInput = vars.input()?;
            to_data(present::<BlogPost>(ctx, blog.update(id, input).await?))
        }
        "deleteBlogPost" => to_data(present::<BlogPost>(ctx, blog.delete(vars.id()?).await?)),
        other => Err(ApiError::UnknownOperation(other.to_string())),
    }
}

async fn leads(state: &AppState, operation: &str, vars: &Variables) -> Result<Value, ApiError> {
    let leads = &state.leads;
    match operation {
        "createLead" => {
            let input: CreateLeadInput = vars.input()?;
            to_data(state.lead_intake.submit(input).await?)
        }
        "leads" => {
            let filter: LeadFilter = vars.optional("where")?.unwrap_or_default();
            let pagination: Option<Pagination> = vars.optional("pagination")?;
            to_data(leads.find_all(&filter, pagination).await?)
        }
        "lead" => to_data(leads.find_by_id(vars.id()?).await?),
        "leadsCount" => {
            let filter = LeadFilter {
                status: vars.optional::<LeadStatus>("status")?,
                ..LeadFilter::default()
            };
            to_data(leads.count(&filter).await?)
        }
        "updateLead" => {
            let id = vars.id()?;
            let input: UpdateLeadInput = vars.input()?;
            to_data(leads.update(id, input).await?)
        }
        "deleteLead" => to_data(leads.delete(vars.id()?).await?),
        other => Err(ApiError::UnknownOperation(other.to_string())),
    }
}

async fn accounts(state: &AppState, operation: &str, vars: &Variables) -> Result<Value, ApiError> {
    let accounts = &state.accounts;
    match operation {
        "users" => {
            let filter: UserFilter = vars.optional("where")?.unwrap_or_default();
            let pagination: Option<Pagination> = vars.optional("pagination")?;
            to_data(accounts.find_all(&filter, pagination).await?)
        }
        "user" => to_data(accounts.find_by_id(vars.id()?).await?),
        "userByClerkId" => {
            let clerk_user_id: String = vars.required("clerkUserId")?;
            to_data(accounts.find_by_key(&clerk_user_id).await?)
        }
        "usersCount" => {
            let filter = UserFilter {
                role: vars.optional::<UserRole>("role")?,
            };
            to_data(accounts.count(&filter).await?)
        }
        "createUser" => {
            let input: CreateUserInput = vars.input()?;
            to_data(accounts.create(input).await?)
        }
        "updateUserRole" => {
            let id = vars.id()?;
            let input: UpdateUserRoleInput = vars.input()?;
            to_data(accounts.update(id, input.into()).await?)
        }
        "deleteUser" => to_data(accounts.delete(vars.id()?).await?),
        other => Err(ApiError::UnknownOperation(other.to_string())),
    }
}
