use agency_api::{
    error::ApiError,
    models::{
        CreateBlogPostInput, CreateLeadInput, CreateServiceInput, CreateUserInput, Lead,
        LeadStatus, Page, Pagination, UpdateBlogPostInput, UpdateServiceInput, UserRole,
    },
    validation::{MAX_TAKE, Validate, resolve_page},
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

fn field_of(result: Result<(), ApiError>) -> Option<String> {
    match result {
        Err(ApiError::ValidationFailed { field, .. }) => field,
        _ => None,
    }
}

fn service_json() -> serde_json::Value {
    json!({
        "name": "Web Development",
        "slug": "web-development",
        "description": "Custom websites built to order"
    })
}

// --- Input constraints ---

#[test]
fn test_valid_service_input_passes() {
    let input: CreateServiceInput = serde_json::from_value(service_json()).unwrap();
    assert!(input.validate().is_ok());
}

#[test]
fn test_service_constraints_name_the_offending_field() {
    let cases = [
        ("name", json!("W")),
        ("slug", json!("Web Development")),
        ("slug", json!("web_development")),
        ("description", json!("short")),
        ("order", json!(-1)),
        ("startingPrice", json!(-100)),
    ];

    for (field, value) in cases {
        let mut raw = service_json();
        raw[field] = value;
        let input: CreateServiceInput = serde_json::from_value(raw).unwrap();
        assert_eq!(field_of(input.validate()).as_deref(), Some(field));
    }
}

#[test]
fn test_unknown_input_fields_are_rejected() {
    let mut raw = service_json();
    raw["price"] = json!(10);
    assert!(serde_json::from_value::<CreateServiceInput>(raw).is_err());
}

#[test]
fn test_patch_checks_only_present_fields() {
    let empty = UpdateServiceInput::default();
    assert!(empty.validate().is_ok());

    let bad_slug: UpdateServiceInput = serde_json::from_value(json!({ "slug": "NOPE" })).unwrap();
    assert_eq!(field_of(bad_slug.validate()).as_deref(), Some("slug"));
}

#[test]
fn test_null_patch_field_is_absent() {
    let patch: UpdateBlogPostInput =
        serde_json::from_value(json!({ "title": null, "isPublished": true })).unwrap();
    assert_eq!(patch.title, None);
    assert_eq!(patch.is_published, Some(true));
    assert!(patch.validate().is_ok());
}

#[test]
fn test_blog_seo_metadata_must_be_object() {
    let raw = json!({
        "title": "Launch",
        "slug": "launch",
        "content": "We are open for business.",
        "seoMetadata": ["not", "an", "object"]
    });
    let input: CreateBlogPostInput = serde_json::from_value(raw).unwrap();
    assert_eq!(field_of(input.validate()).as_deref(), Some("seoMetadata"));
}

#[test]
fn test_lead_constraints() {
    let valid = CreateLeadInput {
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        company: None,
        message: "I would like a quote.".to_string(),
    };
    assert!(valid.validate().is_ok());

    let bad_email = CreateLeadInput {
        email: "john.example.com".to_string(),
        ..valid.clone()
    };
    assert_eq!(field_of(bad_email.validate()).as_deref(), Some("email"));

    let short_message = CreateLeadInput {
        message: "Hi".to_string(),
        ..valid
    };
    assert_eq!(field_of(short_message.validate()).as_deref(), Some("message"));
}

#[test]
fn test_blank_clerk_user_id_rejected() {
    let input = CreateUserInput {
        clerk_user_id: "   ".to_string(),
        role: Some(UserRole::Admin),
    };
    assert_eq!(field_of(input.validate()).as_deref(), Some("clerkUserId"));
}

#[test]
fn test_enum_membership_enforced_by_deserialization() {
    assert!(serde_json::from_value::<LeadStatus>(json!("ARCHIVED")).is_err());
    assert_eq!(
        serde_json::from_value::<UserRole>(json!("SUPER_ADMIN")).unwrap(),
        UserRole::SuperAdmin
    );
}

// --- Pagination ---

#[test]
fn test_resolve_page() {
    assert_eq!(resolve_page(None, 10).unwrap(), None);
    assert_eq!(
        resolve_page(Some(Pagination::default()), 20).unwrap(),
        Some(Page { take: 20, skip: 0 })
    );
    assert_eq!(
        resolve_page(
            Some(Pagination {
                take: Some(MAX_TAKE),
                skip: Some(40)
            }),
            10
        )
        .unwrap(),
        Some(Page {
            take: MAX_TAKE,
            skip: 40
        })
    );
    assert!(
        resolve_page(
            Some(Pagination {
                take: Some(MAX_TAKE + 1),
                skip: None
            }),
            10
        )
        .is_err()
    );
}

// --- Wire shape ---

#[test]
fn test_lead_serializes_camel_case_with_screaming_status() {
    let now = Utc::now();
    let lead = Lead {
        id: Uuid::new_v4(),
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        company: None,
        message: "Quote please".to_string(),
        status: LeadStatus::New,
        notes: None,
        created_at: now,
        updated_at: now,
    };

    let value = serde_json::to_value(&lead).unwrap();
    assert_eq!(value["status"], "NEW");
    assert!(value.get("createdAt").is_some());
    assert!(value.get("created_at").is_none());
}
