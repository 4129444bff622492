use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Lead;

/// Upper bound on one webhook delivery.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook responded with status {0}")]
    Status(u16),
}

/// LeadNotifier
///
/// Outbound hook fired after a lead is stored. Implementations report
/// failures; the caller decides whether they matter (for leads they never do).
#[async_trait]
pub trait LeadNotifier: Send + Sync {
    async fn notify(&self, lead: &Lead) -> Result<(), NotifyError>;
}

/// LeadNotification
///
/// JSON body posted to the automation webhook.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadNotification {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub source: String,
}

impl LeadNotification {
    pub fn from_lead(lead: &Lead, source: &str) -> Self {
        Self {
            id: lead.id,
            name: lead.name.clone(),
            email: lead.email.clone(),
            company: lead.company.clone(),
            message: lead.message.clone(),
            created_at: lead.created_at,
            source: source.to_string(),
        }
    }
}

/// WebhookNotifier
///
/// Posts a [`LeadNotification`] to a fixed URL. The response body is ignored;
/// only the status is checked.
pub struct WebhookNotifier {
    client: Client,
    url: String,
    source: String,
}

impl WebhookNotifier {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(url: impl Into<String>, source: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
            source: source.into(),
        })
    }
}

#[async_trait]
impl LeadNotifier for WebhookNotifier {
    async fn notify(&self, lead: &Lead) -> Result<(), NotifyError> {
        let payload = LeadNotification::from_lead(lead, &self.source);
        let response = self.client.post(&self.url).json(&payload).send().await?;

        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status().as_u16()));
        }
        tracing::debug!(lead_id = %lead.id, "lead webhook delivered");
        Ok(())
    }
}

/// Used when no webhook URL is configured.
pub struct DisabledNotifier;

#[async_trait]
impl LeadNotifier for DisabledNotifier {
    async fn notify(&self, lead: &Lead) -> Result<(), NotifyError> {
        tracing::debug!(lead_id = %lead.id, "lead webhook not configured, skipping");
        Ok(())
    }
}
