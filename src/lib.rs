use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core services.
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod guard;
pub mod i18n;
pub mod lifecycle;
pub mod models;
pub mod notifier;
pub mod operations;
pub mod repository;
pub mod validation;

// HTTP surface: the operation endpoint and the per-tier operation table.
pub mod handlers;
pub mod routes;

// --- Public Re-exports ---

pub use config::AppConfig;
pub use repository::Stores;

use auth::TokenVerifier;
use dashboard::DashboardService;
use guard::AccessGuard;
use lifecycle::{
    LeadIntake, LifecycleService, accounts::AccountService, blog::BlogService,
    catalog::CatalogService, leads::LeadService,
};
use notifier::LeadNotifier;
use operations::OperationRegistry;

/// ApiDoc
///
/// Auto-generated OpenAPI document, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::execute_operation, handlers::health),
    components(
        schemas(
            handlers::OperationRequest, handlers::OperationResponse,
            error::ErrorEntry, error::ErrorExtensions,
            models::Service, models::CreateServiceInput, models::UpdateServiceInput,
            models::ServiceFilter, models::BlogPost, models::CreateBlogPostInput,
            models::UpdateBlogPostInput, models::Lead, models::LeadStatus,
            models::CreateLeadInput, models::UpdateLeadInput, models::LeadFilter,
            models::User, models::UserRole, models::CreateUserInput,
            models::UpdateUserRoleInput, models::UserFilter, models::Pagination,
            models::DashboardStats, models::AuthUserView, i18n::Locale,
        )
    ),
    tags(
        (name = "agency-api", description = "Business site content, leads and accounts API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single shared container for every service the operation handler needs.
/// Cheap to clone: all members are handles.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub blog: BlogService,
    pub leads: LeadService,
    pub lead_intake: LeadIntake,
    pub accounts: AccountService,
    pub dashboard: DashboardService,
    pub guard: AccessGuard,
    pub operations: Arc<OperationRegistry>,
    pub config: AppConfig,
}

impl AppState {
    /// Wires the lifecycle services over `stores` and builds the operation table.
    pub fn new(
        config: AppConfig,
        stores: Stores,
        verifier: Arc<dyn TokenVerifier>,
        notifier: Arc<dyn LeadNotifier>,
    ) -> Self {
        let catalog = LifecycleService::new(stores.services);
        let blog = LifecycleService::new(stores.blog_posts);
        let leads = LifecycleService::new(stores.leads);
        let accounts = LifecycleService::new(stores.users);

        Self {
            lead_intake: LeadIntake::new(leads.clone(), notifier),
            dashboard: DashboardService::new(
                catalog.clone(),
                blog.clone(),
                leads.clone(),
                accounts.clone(),
            ),
            guard: AccessGuard::new(verifier, config.clerk_secret.clone()),
            operations: Arc::new(OperationRegistry::standard()),
            catalog,
            blog,
            leads,
            accounts,
            config,
        }
    }
}

/// Builds the CORS layer from the configured origins. Origins that are not
/// valid header values are skipped with a warning.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// create_router
///
/// Assembles the routes, the documentation UI and the observability stack,
/// and registers the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health))
        // Every named operation goes through the guard inside this handler.
        .route("/api/operations", post(handlers::execute_operation))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                // Generates a UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Echoes the request id back on the response.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the per-request span carrying method, uri and the `x-request-id`,
/// so every log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
