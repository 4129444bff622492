use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EntityStore, StoreError};
use crate::{lifecycle::Entity, models::Page};

/// MemoryStore
///
/// A `Vec` behind an async lock. The unique key is checked while the write
/// lock is held, so concurrent inserts of the same key cannot both succeed.
pub struct MemoryStore<E> {
    rows: RwLock<Vec<E>>,
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

fn key_taken<E: Entity>(rows: &[E], key: Option<&str>, except: Option<Uuid>) -> bool {
    let Some(key) = key else {
        return false;
    };
    rows.iter()
        .any(|row| row.unique_key() == Some(key) && Some(row.id()) != except)
}

#[async_trait]
impl<E: Entity> EntityStore<E> for MemoryStore<E> {
    async fn insert(&self, record: E) -> Result<E, StoreError> {
        let mut rows = self.rows.write().await;
        if key_taken(&rows, record.unique_key(), None) {
            return Err(StoreError::UniqueViolation {
                kind: E::KIND,
                key: record.unique_key().unwrap_or_default().to_string(),
            });
        }
        rows.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.id() == id).cloned())
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<E>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.unique_key() == Some(key)).cloned())
    }

    async fn find_all(&self, filter: &E::Filter, page: Option<Page>) -> Result<Vec<E>, StoreError> {
        let rows = self.rows.read().await;
        let mut matching: Vec<E> = rows.iter().filter(|row| row.matches(filter)).cloned().collect();
        matching.sort_by(|a, b| E::listing_order(a, b, filter));

        let Some(page) = page else {
            return Ok(matching);
        };
        let skip = usize::try_from(page.skip).unwrap_or(0);
        let take = usize::try_from(page.take).unwrap_or(0);
        Ok(matching.into_iter().skip(skip).take(take).collect())
    }

    async fn count(&self, filter: &E::Filter) -> Result<i64, StoreError> {
        let rows = self.rows.read().await;
        let total = rows.iter().filter(|row| row.matches(filter)).count();
        Ok(i64::try_from(total).unwrap_or(i64::MAX))
    }

    async fn save(&self, record: E) -> Result<Option<E>, StoreError> {
        let mut rows = self.rows.write().await;
        if key_taken(&rows, record.unique_key(), Some(record.id())) {
            return Err(StoreError::UniqueViolation {
                kind: E::KIND,
                key: record.unique_key().unwrap_or_default().to_string(),
            });
        }
        match rows.iter_mut().find(|row| row.id() == record.id()) {
            Some(slot) => {
                *slot = record.clone();
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        let mut rows = self.rows.write().await;
        match rows.iter().position(|row| row.id() == id) {
            Some(index) => Ok(Some(rows.remove(index))),
            None => Ok(None),
        }
    }
}
