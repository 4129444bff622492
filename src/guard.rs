use axum::http::{HeaderMap, header};
use std::sync::Arc;

use crate::{
    auth::{Identity, TokenVerifier},
    error::ApiError,
    i18n::LocaleSettings,
    operations::{OperationDescriptor, Visibility},
};

/// RequestContext
///
/// Per-request values handed explicitly into dispatch: the verified identity
/// (absent for public operations) and the locale in effect, if any.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub identity: Option<Identity>,
    pub locale: Option<LocaleSettings>,
}

/// Strips a literal `"Bearer "` prefix. Whatever follows is returned verbatim,
/// including leading whitespace; a value without the prefix is returned whole.
pub fn bearer_token(raw: &str) -> &str {
    raw.strip_prefix("Bearer ").unwrap_or(raw)
}

/// AccessGuard
///
/// Decides admission for one operation call, once, before any side effect.
///
/// Order of checks:
/// 1. Public operations are admitted without looking at headers.
/// 2. A missing (or non-ASCII) `authorization` header is `Unauthenticated`.
/// 3. A missing server secret is `Unauthenticated`; the verifier is not called.
/// 4. A token that fails verification is `Unauthenticated`.
/// 5. Role-gated operations need the identity's metadata role in the set,
///    otherwise `Forbidden`.
#[derive(Clone)]
pub struct AccessGuard {
    verifier: Arc<dyn TokenVerifier>,
    secret: Option<String>,
}

impl AccessGuard {
    pub fn new(verifier: Arc<dyn TokenVerifier>, secret: Option<String>) -> Self {
        Self {
            verifier,
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub async fn admit(
        &self,
        descriptor: &OperationDescriptor,
        headers: &HeaderMap,
    ) -> Result<RequestContext, ApiError> {
        if descriptor.visibility() == Visibility::Public {
            return Ok(RequestContext::default());
        }

        let Some(raw) = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
        else {
            tracing::warn!(operation = descriptor.name(), "missing authorization header");
            return Err(ApiError::unauthenticated("authentication required"));
        };

        let Some(secret) = self.secret.as_deref() else {
            tracing::error!(
                operation = descriptor.name(),
                "token verification secret is not configured"
            );
            return Err(ApiError::unauthenticated("authentication required"));
        };

        let claims = match self.verifier.verify(bearer_token(raw), secret).await {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!(operation = descriptor.name(), error = %e, "token verification failed");
                return Err(ApiError::unauthenticated("invalid or expired token"));
            }
        };
        let identity = Identity::from(claims);

        let roles = descriptor.required_roles();
        if !roles.is_empty() {
            let allowed = identity
                .role
                .as_ref()
                .is_some_and(|role| roles.contains(role));
            if !allowed {
                tracing::warn!(
                    operation = descriptor.name(),
                    subject = %identity.subject,
                    role = ?identity.role,
                    "insufficient role"
                );
                return Err(ApiError::forbidden("insufficient permissions"));
            }
        }

        tracing::debug!(operation = descriptor.name(), subject = %identity.subject, "access granted");
        Ok(RequestContext {
            identity: Some(identity),
            locale: None,
        })
    }
}
