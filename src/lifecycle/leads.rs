use chrono::{DateTime, Utc};
use std::{cmp::Ordering, sync::Arc};
use uuid::Uuid;

use super::{Entity, LifecycleService};
use crate::{
    error::ApiError,
    models::{CreateLeadInput, Lead, LeadFilter, LeadStatus, UpdateLeadInput},
    notifier::LeadNotifier,
};

pub type LeadService = LifecycleService<Lead>;

impl Entity for Lead {
    type Create = CreateLeadInput;
    type Patch = UpdateLeadInput;
    type Filter = LeadFilter;

    const KIND: &'static str = "Lead";
    const KEY_NAME: &'static str = "";
    const DEFAULT_TAKE: i64 = 20;

    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<&str> {
        None
    }

    fn requested_key(_input: &CreateLeadInput) -> Option<&str> {
        None
    }

    fn build(input: CreateLeadInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            company: input.company,
            message: input.message,
            status: LeadStatus::New,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Any status may follow any other.
    fn merge(&mut self, patch: UpdateLeadInput, now: DateTime<Utc>) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(notes) = patch.notes {
            self.notes = Some(notes);
        }
        if let Some(company) = patch.company {
            self.company = Some(company);
        }
        self.updated_at = now;
    }

    fn matches(&self, filter: &LeadFilter) -> bool {
        filter.status.is_none_or(|status| self.status == status)
            && filter.created_from.is_none_or(|from| self.created_at >= from)
            && filter
                .created_before
                .is_none_or(|before| self.created_at < before)
    }

    fn listing_order(a: &Self, b: &Self, _filter: &LeadFilter) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }
}

/// LeadIntake
///
/// Public contact-form path: stores the lead, then notifies the webhook.
/// A notification failure is logged and never changes the returned lead.
#[derive(Clone)]
pub struct LeadIntake {
    leads: LeadService,
    notifier: Arc<dyn LeadNotifier>,
}

impl LeadIntake {
    pub fn new(leads: LeadService, notifier: Arc<dyn LeadNotifier>) -> Self {
        Self { leads, notifier }
    }

    pub async fn submit(&self, input: CreateLeadInput) -> Result<Lead, ApiError> {
        let lead = self.leads.create(input).await?;

        if let Err(e) = self.notifier.notify(&lead).await {
            tracing::warn!(lead_id = %lead.id, error = %e, "lead webhook failed");
        }

        Ok(lead)
    }
}
