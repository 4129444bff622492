use agency_api::{
    lifecycle::{LeadIntake, LifecycleService},
    models::{CreateLeadInput, Lead, LeadStatus},
    notifier::{LeadNotification, LeadNotifier, NotifyError, WebhookNotifier},
    repository::MemoryStore,
};
use axum::{Json, Router, http::StatusCode, routing::post};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tokio::{net::TcpListener, sync::mpsc};
use uuid::Uuid;

// --- Test Server ---

/// Spawns a webhook receiver answering with `status` and forwarding each
/// received body to the returned channel.
async fn spawn_receiver(status: StatusCode) -> (String, mpsc::UnboundedReceiver<Value>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let router = Router::new().route(
        "/hook",
        post(move |Json(body): Json<Value>| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(body);
                status
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://127.0.0.1:{port}/hook"), rx)
}

fn sample_lead() -> Lead {
    let now = Utc::now();
    Lead {
        id: Uuid::new_v4(),
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        company: Some("Acme".to_string()),
        message: "I would like a quote.".to_string(),
        status: LeadStatus::New,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

// --- Tests ---

#[test]
fn test_notification_payload_shape() {
    let lead = sample_lead();
    let value = serde_json::to_value(LeadNotification::from_lead(&lead, "website")).unwrap();

    assert_eq!(value["id"], lead.id.to_string());
    assert_eq!(value["name"], "John Doe");
    assert_eq!(value["company"], "Acme");
    assert_eq!(value["source"], "website");
    assert!(value.get("createdAt").is_some());
    // Pipeline fields stay internal.
    assert!(value.get("status").is_none());
    assert!(value.get("notes").is_none());
}

#[tokio::test]
async fn test_webhook_delivers_payload() {
    let (url, mut rx) = spawn_receiver(StatusCode::OK).await;
    let notifier = WebhookNotifier::new(url, "landing-page").unwrap();
    let lead = sample_lead();

    notifier.notify(&lead).await.unwrap();

    let body = rx.recv().await.expect("webhook received");
    assert_eq!(body["email"], "john@example.com");
    assert_eq!(body["source"], "landing-page");
}

#[tokio::test]
async fn test_webhook_non_success_status_is_error() {
    let (url, _rx) = spawn_receiver(StatusCode::INTERNAL_SERVER_ERROR).await;
    let notifier = WebhookNotifier::new(url, "website").unwrap();

    let err = notifier.notify(&sample_lead()).await.unwrap_err();
    assert!(matches!(err, NotifyError::Status(500)));
}

#[tokio::test]
async fn test_unreachable_webhook_does_not_fail_lead_creation() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let notifier = WebhookNotifier::new(format!("http://127.0.0.1:{port}/hook"), "website").unwrap();
    let leads = LifecycleService::<Lead>::new(Arc::new(MemoryStore::<Lead>::default()));
    let intake = LeadIntake::new(leads.clone(), Arc::new(notifier));

    let input = CreateLeadInput {
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        company: None,
        message: "I would like a quote.".to_string(),
    };
    let lead = intake.submit(input).await.unwrap();

    assert_eq!(lead.status, LeadStatus::New);
    assert!(leads.find_by_id(lead.id).await.unwrap().is_some());
}
