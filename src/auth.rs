use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::AuthUserView;

/// PublicMetadata
///
/// Identity-provider metadata visible to the API. Only `role` is interpreted;
/// anything else is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Claims
///
/// The payload expected inside a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject: the identity-provider user id.
    pub sub: String,
    /// Expiration time. Tokens past this instant are rejected.
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_metadata: Option<PublicMetadata>,
}

/// Identity
///
/// The verified caller of one request. Built from [`Claims`] and never
/// persisted; the stored account mirror is [`crate::models::User`].
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub subject: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    /// Role from token metadata. `None` means no elevated role.
    pub role: Option<String>,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            email: claims.email,
            first_name: claims.first_name,
            last_name: claims.last_name,
            image_url: claims.image_url,
            role: claims.public_metadata.and_then(|m| m.role),
        }
    }
}

impl Identity {
    pub fn view(&self) -> AuthUserView {
        AuthUserView {
            id: self.subject.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            image_url: self.image_url.clone(),
            role: self.role.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("token rejected: {0}")]
    Rejected(#[from] jsonwebtoken::errors::Error),

    #[error("{0}")]
    Other(String),
}

/// TokenVerifier
///
/// Turns a bearer credential into [`Claims`] using the server-held secret.
/// The guard only depends on this trait, so tests can swap in a recording fake.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str, secret: &str) -> Result<Claims, VerifyError>;
}

/// JwtVerifier
///
/// HS256 verification with expiry checks. Audience and issuer are not
/// validated.
#[derive(Debug, Clone, Default)]
pub struct JwtVerifier;

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str, secret: &str) -> Result<Claims, VerifyError> {
        let key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;

        let data = decode::<Claims>(token, &key, &validation)?;
        Ok(data.claims)
    }
}
