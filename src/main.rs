use agency_api::{
    AppState, Stores,
    auth::JwtVerifier,
    config::{AppConfig, Env},
    create_router,
    notifier::{DisabledNotifier, LeadNotifier, WebhookNotifier},
};
use sqlx::postgres::PgPoolOptions;
use std::{error::Error, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: configuration, logging, storage, outbound webhook, then the
/// HTTP server.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // 1. Configuration. `.env` is loaded first so local runs need no exports.
    dotenv::dotenv().ok();
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: invalid configuration: {e}");
            return Err(e.into());
        }
    };

    // 2. Logging. RUST_LOG wins over the default filter.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "agency_api=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    if config.clerk_secret.is_none() {
        tracing::error!("CLERK_SECRET_KEY is not set; every protected operation will be rejected");
    }

    // 3. Storage. Postgres when configured, otherwise process-local stores.
    let stores = match config.db_url.as_deref() {
        Some(db_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(db_url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Connected to Postgres, migrations applied");
            Stores::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            Stores::in_memory()
        }
    };

    // 4. Lead webhook.
    let notifier: Arc<dyn LeadNotifier> = match config.webhook_url.as_deref() {
        Some(url) => Arc::new(WebhookNotifier::new(url, config.webhook_source.clone())?),
        None => {
            tracing::info!("N8N_WEBHOOK_URL not set; lead notifications disabled");
            Arc::new(DisabledNotifier)
        }
    };

    // 5. State, router and server.
    let port = config.port;
    let app_state = AppState::new(config, stores, Arc::new(JwtVerifier), notifier);
    let app = create_router(app_state);

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;

    tracing::info!("Listening on 0.0.0.0:{port}");
    tracing::info!("API Documentation (Swagger UI) available at: http://localhost:{port}/swagger-ui");

    axum::serve(listener, app).await?;
    Ok(())
}
