use chrono::{DateTime, Utc};
use std::{cmp::Ordering, sync::Arc};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::Pagination,
    repository::EntityStore,
    validation::resolve_page,
};

pub mod accounts;
pub mod blog;
pub mod catalog;
pub mod leads;

pub use leads::LeadIntake;

/// Entity
///
/// Everything the generic lifecycle needs to know about one entity kind:
/// how to build it from a create payload, how to merge a patch into it, how
/// to filter and order it, and which field (if any) is its unique key.
pub trait Entity: Clone + Send + Sync + 'static {
    type Create: Send;
    type Patch: Send;
    type Filter: Default + Clone + Send + Sync;

    /// Human readable kind, used in error messages and logs.
    const KIND: &'static str;
    /// Name of the unique key variable (`slug`, `clerkUserId`); empty when none.
    const KEY_NAME: &'static str;
    /// Page size used when a pagination object omits `take`.
    const DEFAULT_TAKE: i64;

    fn id(&self) -> Uuid;

    fn unique_key(&self) -> Option<&str>;

    /// The unique key a create payload asks for.
    fn requested_key(input: &Self::Create) -> Option<&str>;

    fn build(input: Self::Create, now: DateTime<Utc>) -> Self;

    /// Applies the fields present in `patch` and refreshes `updated_at`.
    fn merge(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Default listing order for the given filter.
    fn listing_order(a: &Self, b: &Self, filter: &Self::Filter) -> Ordering;
}

/// LifecycleService
///
/// The create / find / update / delete / count contract shared by every
/// entity kind. The pre-insert key lookup gives a friendly conflict; the store
/// still enforces the key on its own.
pub struct LifecycleService<E: Entity> {
    store: Arc<dyn EntityStore<E>>,
}

impl<E: Entity> Clone for LifecycleService<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<E: Entity> LifecycleService<E> {
    pub fn new(store: Arc<dyn EntityStore<E>>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: E::Create) -> Result<E, ApiError> {
        if let Some(key) = E::requested_key(&input) {
            if self.store.find_by_key(key).await?.is_some() {
                return Err(ApiError::conflict(format!(
                    "{} with {} '{}' already exists",
                    E::KIND,
                    E::KEY_NAME,
                    key
                )));
            }
        }

        let record = E::build(input, Utc::now());
        let created = self.store.insert(record).await?;
        tracing::info!(kind = E::KIND, id = %created.id(), key = ?created.unique_key(), "entity created");
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, patch: E::Patch) -> Result<E, ApiError> {
        let mut record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(E::KIND))?;

        record.merge(patch, Utc::now());

        let updated = self
            .store
            .save(record)
            .await?
            .ok_or_else(|| ApiError::not_found(E::KIND))?;
        tracing::info!(kind = E::KIND, id = %id, "entity updated");
        Ok(updated)
    }

    /// Removes the record and returns its last state.
    pub async fn delete(&self, id: Uuid) -> Result<E, ApiError> {
        let removed = self
            .store
            .delete(id)
            .await?
            .ok_or_else(|| ApiError::not_found(E::KIND))?;
        tracing::info!(kind = E::KIND, id = %id, "entity deleted");
        Ok(removed)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, ApiError> {
        Ok(self.store.find_by_id(id).await?)
    }

    pub async fn find_by_key(&self, key: &str) -> Result<Option<E>, ApiError> {
        Ok(self.store.find_by_key(key).await?)
    }

    /// Lists matching records. Without a pagination object the listing is unbounded.
    pub async fn find_all(
        &self,
        filter: &E::Filter,
        pagination: Option<Pagination>,
    ) -> Result<Vec<E>, ApiError> {
        let page = resolve_page(pagination, E::DEFAULT_TAKE)?;
        Ok(self.store.find_all(filter, page).await?)
    }

    pub async fn count(&self, filter: &E::Filter) -> Result<i64, ApiError> {
        Ok(self.store.count(filter).await?)
    }
}
