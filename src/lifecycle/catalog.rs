use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use uuid::Uuid;

use super::{Entity, LifecycleService};
use crate::models::{CreateServiceInput, Service, ServiceFilter, UpdateServiceInput};

pub type CatalogService = LifecycleService<Service>;

impl Entity for Service {
    type Create = CreateServiceInput;
    type Patch = UpdateServiceInput;
    type Filter = ServiceFilter;

    const KIND: &'static str = "Service";
    const KEY_NAME: &'static str = "slug";
    const DEFAULT_TAKE: i64 = 20;

    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.slug)
    }

    fn requested_key(input: &CreateServiceInput) -> Option<&str> {
        Some(&input.slug)
    }

    fn build(input: CreateServiceInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            slug: input.slug,
            description: input.description,
            icon: input.icon,
            order: input.order.unwrap_or(0),
            is_active: input.is_active.unwrap_or(true),
            starting_price: input.starting_price,
            translations: input.translations,
            created_at: now,
            updated_at: now,
        }
    }

    fn merge(&mut self, patch: UpdateServiceInput, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(slug) = patch.slug {
            self.slug = slug;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(icon) = patch.icon {
            self.icon = Some(icon);
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(price) = patch.starting_price {
            self.starting_price = Some(price);
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
        if let Some(translations) = patch.translations {
            self.translations = Some(translations);
        }
        self.updated_at = now;
    }

    fn matches(&self, filter: &ServiceFilter) -> bool {
        filter.is_active.is_none_or(|active| self.is_active == active)
    }

    fn listing_order(a: &Self, b: &Self, _filter: &ServiceFilter) -> Ordering {
        a.order
            .cmp(&b.order)
            .then_with(|| a.created_at.cmp(&b.created_at))
    }
}
