use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, types::Json};
use uuid::Uuid;

use super::{EntityStore, StoreError};
use crate::{
    i18n::Translations,
    lifecycle::Entity,
    models::{
        BlogPost, BlogPostFilter, BlogPostTranslation, Lead, LeadFilter, Page, Service,
        ServiceFilter, ServiceTranslation, User, UserFilter,
    },
};

/// PostgresRepository
///
/// The Postgres-backed store for every entity kind. Unique keys are backed by
/// `UNIQUE` constraints (see `migrations/`), and constraint violations are
/// reported as [`StoreError::UniqueViolation`].
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a write error, turning unique-constraint violations into conflicts.
fn write_error(kind: &'static str, key: Option<&str>, err: sqlx::Error) -> StoreError {
    let unique = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique {
        StoreError::UniqueViolation {
            kind,
            key: key.unwrap_or_default().to_string(),
        }
    } else {
        StoreError::Database(err)
    }
}

fn push_page(builder: &mut QueryBuilder<'_, Postgres>, page: Option<Page>) {
    if let Some(page) = page {
        builder.push(" LIMIT ");
        builder.push_bind(page.take);
        builder.push(" OFFSET ");
        builder.push_bind(page.skip);
    }
}

// --- Services ---

const SERVICE_COLUMNS: &str = "id, name, slug, description, icon, sort_order, is_active, \
     starting_price, translations, created_at, updated_at";

#[derive(FromRow)]
struct ServiceRow {
    id: Uuid,
    name: String,
    slug: String,
    description: String,
    icon: Option<String>,
    sort_order: i32,
    is_active: bool,
    starting_price: Option<i32>,
    translations: Option<Json<Translations<ServiceTranslation>>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            icon: row.icon,
            order: row.sort_order,
            is_active: row.is_active,
            starting_price: row.starting_price,
            translations: row.translations.map(|Json(t)| t),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn push_service_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ServiceFilter) {
    if let Some(active) = filter.is_active {
        builder.push(" AND is_active = ");
        builder.push_bind(active);
    }
}

#[async_trait]
impl EntityStore<Service> for PostgresRepository {
    async fn insert(&self, record: Service) -> Result<Service, StoreError> {
        let sql = format!(
            "INSERT INTO services ({SERVICE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {SERVICE_COLUMNS}"
        );
        sqlx::query_as::<_, ServiceRow>(&sql)
            .bind(record.id)
            .bind(&record.name)
            .bind(&record.slug)
            .bind(&record.description)
            .bind(&record.icon)
            .bind(record.order)
            .bind(record.is_active)
            .bind(record.starting_price)
            .bind(record.translations.clone().map(Json))
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await
            .map(Service::from)
            .map_err(|e| write_error(Service::KIND, Some(&record.slug), e))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, StoreError> {
        let sql = format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1");
        let row = sqlx::query_as::<_, ServiceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Service::from))
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Service>, StoreError> {
        let sql = format!("SELECT {SERVICE_COLUMNS} FROM services WHERE slug = $1");
        let row = sqlx::query_as::<_, ServiceRow>(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Service::from))
    }

    async fn find_all(
        &self,
        filter: &ServiceFilter,
        page: Option<Page>,
    ) -> Result<Vec<Service>, StoreError> {
        let mut builder =
            QueryBuilder::new(format!("SELECT {SERVICE_COLUMNS} FROM services WHERE TRUE"));
        push_service_filter(&mut builder, filter);
        builder.push(" ORDER BY sort_order ASC, created_at ASC");
        push_page(&mut builder, page);

        let rows = builder
            .build_query_as::<ServiceRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Service::from).collect())
    }

    async fn count(&self, filter: &ServiceFilter) -> Result<i64, StoreError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM services WHERE TRUE");
        push_service_filter(&mut builder, filter);
        Ok(builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?)
    }

    async fn save(&self, record: Service) -> Result<Option<Service>, StoreError> {
        let sql = format!(
            "UPDATE services SET name = $2, slug = $3, description = $4, icon = $5, \
             sort_order = $6, is_active = $7, starting_price = $8, translations = $9, \
             updated_at = $10 \
             WHERE id = $1 RETURNING {SERVICE_COLUMNS}"
        );
        sqlx::query_as::<_, ServiceRow>(&sql)
            .bind(record.id)
            .bind(&record.name)
            .bind(&record.slug)
            .bind(&record.description)
            .bind(&record.icon)
            .bind(record.order)
            .bind(record.is_active)
            .bind(record.starting_price)
            .bind(record.translations.clone().map(Json))
            .bind(record.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Service::from))
            .map_err(|e| write_error(Service::KIND, Some(&record.slug), e))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Service>, StoreError> {
        let sql = format!("DELETE FROM services WHERE id = $1 RETURNING {SERVICE_COLUMNS}");
        let row = sqlx::query_as::<_, ServiceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Service::from))
    }
}

// --- Blog posts ---

const BLOG_POST_COLUMNS: &str = "id, slug, title, excerpt, content, cover_image, seo_metadata, \
     is_published, published_at, translations, created_at, updated_at";

#[derive(FromRow)]
struct BlogPostRow {
    id: Uuid,
    slug: String,
    title: String,
    excerpt: Option<String>,
    content: String,
    cover_image: Option<String>,
    seo_metadata: Option<serde_json::Value>,
    is_published: bool,
    published_at: Option<DateTime<Utc>>,
    translations: Option<Json<Translations<BlogPostTranslation>>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BlogPostRow> for BlogPost {
    fn from(row: BlogPostRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            excerpt: row.excerpt,
            content: row.content,
            cover_image: row.cover_image,
            seo_metadata: row.seo_metadata,
            is_published: row.is_published,
            published_at: row.published_at,
            translations: row.translations.map(|Json(t)| t),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn push_blog_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &BlogPostFilter) {
    if let Some(published) = filter.is_published {
        builder.push(" AND is_published = ");
        builder.push_bind(published);
    }
}

#[async_trait]
impl EntityStore<BlogPost> for PostgresRepository {
    async fn insert(&self, record: BlogPost) -> Result<BlogPost, StoreError> {
        let sql = format!(
            "INSERT INTO blog_posts ({BLOG_POST_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {BLOG_POST_COLUMNS}"
        );
        sqlx::query_as::<_, BlogPostRow>(&sql)
            .bind(record.id)
            .bind(&record.slug)
            .bind(&record.title)
            .bind(&record.excerpt)
            .bind(&record.content)
            .bind(&record.cover_image)
            .bind(&record.seo_metadata)
            .bind(record.is_published)
            .bind(record.published_at)
            .bind(record.translations.clone().map(Json))
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await
            .map(BlogPost::from)
            .map_err(|e| write_error(BlogPost::KIND, Some(&record.slug), e))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPost>, StoreError> {
        let sql = format!("SELECT {BLOG_POST_COLUMNS} FROM blog_posts WHERE id = $1");
        let row = sqlx::query_as::<_, BlogPostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(BlogPost::from))
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<BlogPost>, StoreError> {
        let sql = format!("SELECT {BLOG_POST_COLUMNS} FROM blog_posts WHERE slug = $1");
        let row = sqlx::query_as::<_, BlogPostRow>(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(BlogPost::from))
    }

    async fn find_all(
        &self,
        filter: &BlogPostFilter,
        page: Option<Page>,
    ) -> Result<Vec<BlogPost>, StoreError> {
        let mut builder =
            QueryBuilder::new(format!("SELECT {BLOG_POST_COLUMNS} FROM blog_posts WHERE TRUE"));
        push_blog_filter(&mut builder, filter);
        if filter.is_published == Some(true) {
            builder.push(" ORDER BY published_at DESC NULLS LAST, created_at DESC");
        } else {
            builder.push(" ORDER BY created_at DESC");
        }
        push_page(&mut builder, page);

        let rows = builder
            .build_query_as::<BlogPostRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(BlogPost::from).collect())
    }

    async fn count(&self, filter: &BlogPostFilter) -> Result<i64, StoreError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM blog_posts WHERE TRUE");
        push_blog_filter(&mut builder, filter);
        Ok(builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?)
    }

    async fn save(&self, record: BlogPost) -> Result<Option<BlogPost>, StoreError> {
        let sql = format!(
            "UPDATE blog_posts SET slug = $2, title = $3, excerpt = $4, content = $5, \
             cover_image = $6, seo_metadata = $7, is_published = $8, published_at = $9, \
             translations = $10, updated_at = $11 \
             WHERE id = $1 RETURNING {BLOG_POST_COLUMNS}"
        );
        sqlx::query_as::<_, BlogPostRow>(&sql)
            .bind(record.id)
            .bind(&record.slug)
            .bind(&record.title)
            .bind(&record.excerpt)
            .bind(&record.content)
            .bind(&record.cover_image)
            .bind(&record.seo_metadata)
            .bind(record.is_published)
            .bind(record.published_at)
            .bind(record.translations.clone().map(Json))
            .bind(record.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(BlogPost::from))
            .map_err(|e| write_error(BlogPost::KIND, Some(&record.slug), e))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<BlogPost>, StoreError> {
        let sql = format!("DELETE FROM blog_posts WHERE id = $1 RETURNING {BLOG_POST_COLUMNS}");
        let row = sqlx::query_as::<_, BlogPostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(BlogPost::from))
    }
}

// --- Leads ---

const LEAD_COLUMNS: &str =
    "id, name, email, company, message, status, notes, created_at, updated_at";

fn push_lead_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &LeadFilter) {
    if let Some(status) = filter.status {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }
    if let Some(from) = filter.created_from {
        builder.push(" AND created_at >= ");
        builder.push_bind(from);
    }
    if let Some(before) = filter.created_before {
        builder.push(" AND created_at < ");
        builder.push_bind(before);
    }
}

#[async_trait]
impl EntityStore<Lead> for PostgresRepository {
    async fn insert(&self, record: Lead) -> Result<Lead, StoreError> {
        let sql = format!(
            "INSERT INTO leads ({LEAD_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {LEAD_COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&sql)
            .bind(record.id)
            .bind(&record.name)
            .bind(&record.email)
            .bind(&record.company)
            .bind(&record.message)
            .bind(record.status)
            .bind(&record.notes)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error(Lead::KIND, None, e))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lead>, StoreError> {
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1");
        Ok(sqlx::query_as::<_, Lead>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Leads carry no unique key.
    async fn find_by_key(&self, _key: &str) -> Result<Option<Lead>, StoreError> {
        Ok(None)
    }

    async fn find_all(&self, filter: &LeadFilter, page: Option<Page>) -> Result<Vec<Lead>, StoreError> {
        let mut builder = QueryBuilder::new(format!("SELECT {LEAD_COLUMNS} FROM leads WHERE TRUE"));
        push_lead_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC");
        push_page(&mut builder, page);

        Ok(builder
            .build_query_as::<Lead>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn count(&self, filter: &LeadFilter) -> Result<i64, StoreError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM leads WHERE TRUE");
        push_lead_filter(&mut builder, filter);
        Ok(builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?)
    }

    async fn save(&self, record: Lead) -> Result<Option<Lead>, StoreError> {
        let sql = format!(
            "UPDATE leads SET name = $2, email = $3, company = $4, message = $5, \
             status = $6, notes = $7, updated_at = $8 \
             WHERE id = $1 RETURNING {LEAD_COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&sql)
            .bind(record.id)
            .bind(&record.name)
            .bind(&record.email)
            .bind(&record.company)
            .bind(&record.message)
            .bind(record.status)
            .bind(&record.notes)
            .bind(record.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error(Lead::KIND, None, e))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Lead>, StoreError> {
        let sql = format!("DELETE FROM leads WHERE id = $1 RETURNING {LEAD_COLUMNS}");
        Ok(sqlx::query_as::<_, Lead>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

// --- Users ---

const USER_COLUMNS: &str = "id, clerk_user_id, role, created_at, updated_at";

fn push_user_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    if let Some(role) = filter.role {
        builder.push(" AND role = ");
        builder.push_bind(role);
    }
}

#[async_trait]
impl EntityStore<User> for PostgresRepository {
    async fn insert(&self, record: User) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(record.id)
            .bind(&record.clerk_user_id)
            .bind(record.role)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error(User::KIND, Some(&record.clerk_user_id), e))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE clerk_user_id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_all(&self, filter: &UserFilter, page: Option<Page>) -> Result<Vec<User>, StoreError> {
        let mut builder = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE TRUE"));
        push_user_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC");
        push_page(&mut builder, page);

        Ok(builder
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn count(&self, filter: &UserFilter) -> Result<i64, StoreError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM users WHERE TRUE");
        push_user_filter(&mut builder, filter);
        Ok(builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?)
    }

    async fn save(&self, record: User) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "UPDATE users SET clerk_user_id = $2, role = $3, updated_at = $4 \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(record.id)
            .bind(&record.clerk_user_id)
            .bind(record.role)
            .bind(record.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error(User::KIND, Some(&record.clerk_user_id), e))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }
}
