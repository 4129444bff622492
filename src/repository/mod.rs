use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    lifecycle::Entity,
    models::{BlogPost, Lead, Page, Service, User},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresRepository;

/// StoreError
///
/// Failures raised by a backing store. Unique-key violations are reported
/// separately so the lifecycle layer can surface them as conflicts.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} with key '{key}' already exists")]
    UniqueViolation { kind: &'static str, key: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// EntityStore
///
/// Persistence contract for one entity kind. Every implementation must enforce
/// uniqueness of [`Entity::unique_key`] itself; the pre-insert lookup done by
/// the lifecycle service is not atomic with the insert.
///
/// **Send + Sync + async_trait** keep `Arc<dyn EntityStore<E>>` shareable
/// across Axum's request tasks.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    async fn insert(&self, record: E) -> Result<E, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, StoreError>;

    /// Lookup by the kind's unique key (slug, or clerk user id for accounts).
    async fn find_by_key(&self, key: &str) -> Result<Option<E>, StoreError>;

    /// Lists records matching `filter` in the kind's default order.
    async fn find_all(&self, filter: &E::Filter, page: Option<Page>) -> Result<Vec<E>, StoreError>;

    async fn count(&self, filter: &E::Filter) -> Result<i64, StoreError>;

    /// Writes every mutable column of `record`. Returns `None` if the row is gone.
    async fn save(&self, record: E) -> Result<Option<E>, StoreError>;

    /// Removes the row and returns its last state.
    async fn delete(&self, id: Uuid) -> Result<Option<E>, StoreError>;
}

/// Stores
///
/// One store handle per entity kind, shared by the application state.
#[derive(Clone)]
pub struct Stores {
    pub services: Arc<dyn EntityStore<Service>>,
    pub blog_posts: Arc<dyn EntityStore<BlogPost>>,
    pub leads: Arc<dyn EntityStore<Lead>>,
    pub users: Arc<dyn EntityStore<User>>,
}

impl Stores {
    /// All four kinds backed by the same Postgres pool.
    pub fn postgres(pool: PgPool) -> Self {
        let repo = Arc::new(PostgresRepository::new(pool));
        Self {
            services: repo.clone(),
            blog_posts: repo.clone(),
            leads: repo.clone(),
            users: repo,
        }
    }

    /// Process-local stores. Used by the test suite and by local runs without
    /// a `DATABASE_URL`.
    pub fn in_memory() -> Self {
        Self {
            services: Arc::new(MemoryStore::<Service>::default()),
            blog_posts: Arc::new(MemoryStore::<BlogPost>::default()),
            leads: Arc::new(MemoryStore::<Lead>::default()),
            users: Arc::new(MemoryStore::<User>::default()),
        }
    }
}
