use std::env;
use thiserror::Error;

use crate::i18n::Locale;

/// AppConfig
///
/// The application's configuration, loaded once at startup and immutable
/// afterwards. Cloned into the shared application state.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the log format and which settings are mandatory.
    pub env: Env,
    // Postgres connection string. Optional locally, where the in-memory store is used instead.
    pub db_url: Option<String>,
    // Secret used to verify session tokens. Absent means every protected operation fails closed.
    pub clerk_secret: Option<String>,
    // Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
    // Lead notification webhook. Absent means notifications are skipped.
    pub webhook_url: Option<String>,
    // `source` field sent with each lead notification.
    pub webhook_source: String,
    // Locale used when a requested translation is missing.
    pub fallback_locale: Locale,
    pub port: u16,
}

/// Env
///
/// Runtime context: pretty logs and optional database locally, JSON logs and
/// a mandatory database in production.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
pub const DEFAULT_WEBHOOK_SOURCE: &str = "website";
pub const DEFAULT_PORT: u16 = 4000;

impl Default for AppConfig {
    /// Local settings with no database, secret or webhook. Used by tests.
    fn default() -> Self {
        Self {
            env: Env::Local,
            db_url: None,
            clerk_secret: None,
            allowed_origins: vec![DEFAULT_FRONTEND_URL.to_string()],
            webhook_url: None,
            webhook_source: DEFAULT_WEBHOOK_SOURCE.to_string(),
            fallback_locale: Locale::Es,
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if a variable required in the current
    /// environment is missing or a value cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup. Empty
    /// values count as unset.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let env = match get("APP_ENV").as_deref() {
            Some("production") => Env::Production,
            _ => Env::Local,
        };

        let db_url = get("DATABASE_URL");
        if env == Env::Production && db_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let allowed_origins = get("FRONTEND_URL")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec![DEFAULT_FRONTEND_URL.to_string()]);

        let fallback_locale = match get("DEFAULT_LOCALE") {
            Some(raw) => raw.parse::<Locale>().map_err(|_| ConfigError::Invalid {
                name: "DEFAULT_LOCALE",
                value: raw,
            })?,
            None => Locale::Es,
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            env,
            db_url,
            clerk_secret: get("CLERK_SECRET_KEY"),
            allowed_origins,
            webhook_url: get("N8N_WEBHOOK_URL"),
            webhook_source: get("WEBHOOK_SOURCE")
                .unwrap_or_else(|| DEFAULT_WEBHOOK_SOURCE.to_string()),
            fallback_locale,
            port,
        })
    }
}
