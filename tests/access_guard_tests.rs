use agency_api::{
    auth::{Claims, JwtVerifier, PublicMetadata, TokenVerifier, VerifyError},
    error::ApiError,
    guard::{AccessGuard, bearer_token},
    operations::OperationDescriptor,
};
use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, header};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::{
    sync::{Arc, Mutex},
    time::SystemTime,
};

// --- Test Doubles ---

/// Records every token it is asked to verify and answers with a fixed result.
struct RecordingVerifier {
    seen: Mutex<Vec<String>>,
    role: Option<String>,
    accept: bool,
}

impl RecordingVerifier {
    fn accepting(role: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            role: role.map(str::to_string),
            accept: true,
        })
    }

    fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            role: None,
            accept: false,
        })
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenVerifier for RecordingVerifier {
    async fn verify(&self, token: &str, _secret: &str) -> Result<Claims, VerifyError> {
        self.seen.lock().unwrap().push(token.to_string());
        if !self.accept {
            return Err(VerifyError::Other("bad signature".to_string()));
        }
        Ok(claims_with_role(self.role.as_deref(), 3600))
    }
}

// --- Helper Functions ---

const TEST_SECRET: &str = "test-secret-value-1234567890";

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn claims_with_role(role: Option<&str>, exp_offset: i64) -> Claims {
    let now = now_secs() as i64;
    Claims {
        sub: "user_2abc".to_string(),
        exp: (now + exp_offset) as usize,
        iat: Some(now as usize),
        email: Some("ana@example.com".to_string()),
        first_name: Some("Ana".to_string()),
        last_name: None,
        image_url: None,
        public_metadata: Some(PublicMetadata {
            role: role.map(str::to_string),
            ..PublicMetadata::default()
        }),
    }
}

fn mint(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn auth_headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
}

fn guard(verifier: Arc<RecordingVerifier>) -> AccessGuard {
    AccessGuard::new(verifier, Some(TEST_SECRET.to_string()))
}

fn admin_only() -> OperationDescriptor {
    OperationDescriptor::restricted("deleteService", ["admin"])
}

// --- Tests ---

#[tokio::test]
async fn test_public_operation_admitted_without_credential() {
    let verifier = RecordingVerifier::accepting(None);
    let ctx = guard(verifier.clone())
        .admit(&OperationDescriptor::public("services"), &HeaderMap::new())
        .await
        .unwrap();

    assert!(ctx.identity.is_none());
    assert!(verifier.seen().is_empty());
}

#[tokio::test]
async fn test_public_operation_ignores_supplied_token() {
    let verifier = RecordingVerifier::rejecting();
    let ctx = guard(verifier.clone())
        .admit(
            &OperationDescriptor::public("createLead"),
            &auth_headers("Bearer garbage"),
        )
        .await
        .unwrap();

    assert!(ctx.identity.is_none());
    assert!(verifier.seen().is_empty());
}

#[tokio::test]
async fn test_missing_header_is_unauthenticated_without_verification() {
    let verifier = RecordingVerifier::accepting(Some("admin"));
    let err = guard(verifier.clone())
        .admit(&OperationDescriptor::authenticated("me"), &HeaderMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthenticated(_)));
    assert!(verifier.seen().is_empty());
}

#[tokio::test]
async fn test_unauthenticated_takes_precedence_over_forbidden() {
    let verifier = RecordingVerifier::accepting(Some("editor"));
    let err = guard(verifier)
        .admit(&admin_only(), &HeaderMap::new())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_bearer_prefix_remainder_passed_verbatim() {
    let verifier = RecordingVerifier::accepting(None);
    guard(verifier.clone())
        .admit(
            &OperationDescriptor::authenticated("me"),
            &auth_headers("Bearer   x"),
        )
        .await
        .unwrap();

    assert_eq!(verifier.seen(), vec!["  x".to_string()]);
}

#[tokio::test]
async fn test_header_without_prefix_passed_whole() {
    let verifier = RecordingVerifier::accepting(None);
    guard(verifier.clone())
        .admit(&OperationDescriptor::authenticated("me"), &auth_headers("raw.jwt.value"))
        .await
        .unwrap();

    assert_eq!(verifier.seen(), vec!["raw.jwt.value".to_string()]);
}

#[test]
fn test_bearer_token_strips_exact_prefix_only() {
    assert_eq!(bearer_token("Bearer abc"), "abc");
    assert_eq!(bearer_token("Bearer   abc"), "  abc");
    assert_eq!(bearer_token("bearer abc"), "bearer abc");
    assert_eq!(bearer_token("abc"), "abc");
}

#[tokio::test]
async fn test_missing_secret_fails_closed_without_calling_verifier() {
    let verifier = RecordingVerifier::accepting(Some("admin"));
    for secret in [None, Some(String::new())] {
        let guard = AccessGuard::new(verifier.clone(), secret);
        let err = guard
            .admit(&admin_only(), &auth_headers("Bearer token"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    assert!(verifier.seen().is_empty());
}

#[tokio::test]
async fn test_verification_failure_is_unauthenticated() {
    let verifier = RecordingVerifier::rejecting();
    let err = guard(verifier.clone())
        .admit(&admin_only(), &auth_headers("Bearer forged"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthenticated(_)));
    assert_eq!(verifier.seen().len(), 1);
}

#[tokio::test]
async fn test_wrong_role_is_forbidden() {
    let err = guard(RecordingVerifier::accepting(Some("editor")))
        .admit(&admin_only(), &auth_headers("Bearer token"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn test_missing_role_is_forbidden() {
    let err = guard(RecordingVerifier::accepting(None))
        .admit(&admin_only(), &auth_headers("Bearer token"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "FORBIDDEN");
}

#[tokio::test]
async fn test_matching_role_admitted_with_identity() {
    let ctx = guard(RecordingVerifier::accepting(Some("admin")))
        .admit(&admin_only(), &auth_headers("Bearer token"))
        .await
        .unwrap();

    let identity = ctx.identity.expect("identity attached");
    assert_eq!(identity.subject, "user_2abc");
    assert_eq!(identity.role.as_deref(), Some("admin"));
    assert_eq!(identity.email.as_deref(), Some("ana@example.com"));
}

#[tokio::test]
async fn test_any_role_set_member_is_admitted() {
    let descriptor = OperationDescriptor::restricted("dashboardStats", ["admin", "editor"]);
    let result = guard(RecordingVerifier::accepting(Some("editor")))
        .admit(&descriptor, &auth_headers("Bearer token"))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_authenticated_operation_admits_identity_without_role() {
    let ctx = guard(RecordingVerifier::accepting(None))
        .admit(&OperationDescriptor::authenticated("me"), &auth_headers("Bearer token"))
        .await
        .unwrap();

    assert_eq!(ctx.identity.unwrap().role, None);
}

// --- HS256 verifier ---

#[tokio::test]
async fn test_jwt_verifier_accepts_valid_token() {
    let token = mint(&claims_with_role(Some("admin"), 3600), TEST_SECRET);
    let claims = JwtVerifier.verify(&token, TEST_SECRET).await.unwrap();

    assert_eq!(claims.sub, "user_2abc");
    assert_eq!(claims.public_metadata.unwrap().role.as_deref(), Some("admin"));
}

#[tokio::test]
async fn test_jwt_verifier_rejects_expired_token() {
    let token = mint(&claims_with_role(None, -3600), TEST_SECRET);
    let result = JwtVerifier.verify(&token, TEST_SECRET).await;

    assert!(matches!(result, Err(VerifyError::Rejected(_))));
}

#[tokio::test]
async fn test_jwt_verifier_rejects_wrong_secret() {
    let token = mint(&claims_with_role(None, 3600), "some-other-secret");
    assert!(JwtVerifier.verify(&token, TEST_SECRET).await.is_err());
}

#[tokio::test]
async fn test_guard_with_real_verifier_end_to_end() {
    let guard = AccessGuard::new(Arc::new(JwtVerifier), Some(TEST_SECRET.to_string()));
    let token = mint(&claims_with_role(Some("admin"), 3600), TEST_SECRET);

    let ctx = guard
        .admit(&admin_only(), &auth_headers(&format!("Bearer {token}")))
        .await
        .unwrap();
    assert!(ctx.identity.is_some());

    // Extra whitespace after the prefix reaches the verifier and breaks the token.
    let err = guard
        .admit(&admin_only(), &auth_headers(&format!("Bearer   {token}")))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated(_)));
}
