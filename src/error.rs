use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::repository::StoreError;

/// ApiError
///
/// The failure taxonomy every operation can surface. Callers switch on
/// [`ApiError::code`]; the message is for humans and logs only.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential, an unverifiable credential, or no server secret.
    #[error("{0}")]
    Unauthenticated(String),

    /// Valid credential without one of the required roles.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Input shape or constraint violation, raised before any lifecycle logic.
    #[error("{message}")]
    ValidationFailed {
        message: String,
        field: Option<String>,
    },

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(kind: &str) -> Self {
        Self::NotFound(format!("{kind} not found"))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Stable machine-readable category.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::ValidationFailed { .. } => "VALIDATION_FAILED",
            Self::UnknownOperation(_) => "UNKNOWN_OPERATION",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ValidationFailed { .. } | Self::UnknownOperation(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn field(&self) -> Option<String> {
        match self {
            Self::ValidationFailed { field, .. } => field.clone(),
            _ => None,
        }
    }

    /// Builds the structured error entry for the response envelope.
    pub fn to_entry(&self, operation: &str) -> ErrorEntry {
        ErrorEntry {
            message: self.to_string(),
            operation: operation.to_string(),
            extensions: ErrorExtensions {
                code: self.code().to_string(),
                field: self.field(),
            },
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { kind, key } => {
                Self::Conflict(format!("{kind} with key '{key}' already exists"))
            }
            StoreError::Database(e) => {
                tracing::error!("store error: {:?}", e);
                Self::Internal("internal storage error".to_string())
            }
        }
    }
}

/// ErrorEntry
///
/// One structured error in the `errors` array of an operation response.
#[derive(Debug, Clone, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct ErrorEntry {
    pub message: String,
    pub operation: String,
    pub extensions: ErrorExtensions,
}

#[derive(Debug, Clone, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct ErrorExtensions {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// OperationFailure
///
/// An [`ApiError`] bound to the operation that raised it, rendered as the
/// `{ data: null, errors: [...] }` envelope with the error's status code.
#[derive(Debug)]
pub struct OperationFailure {
    pub operation: String,
    pub error: ApiError,
}

impl IntoResponse for OperationFailure {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "data": null,
            "errors": [self.error.to_entry(&self.operation)],
        });
        (self.error.status(), Json(body)).into_response()
    }
}
