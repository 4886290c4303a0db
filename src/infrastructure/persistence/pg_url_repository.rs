//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::ShortenedUrl;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Column list shared by every `SELECT` on `shortened_urls`.
pub(crate) const URL_COLUMNS: &str = "id, original_url, short_code, created_at, expires_at, \
     click_count, is_active, created_by";

/// Row shape of `shortened_urls`.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UrlRow {
    id: Uuid,
    original_url: String,
    short_code: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    click_count: i64,
    is_active: bool,
    created_by: Option<String>,
}

impl From<UrlRow> for ShortenedUrl {
    fn from(row: UrlRow) -> Self {
        ShortenedUrl::rehydrate(
            row.id,
            row.original_url,
            row.short_code,
            row.created_at,
            row.expires_at,
            row.click_count,
            row.is_active,
            row.created_by,
        )
    }
}

/// PostgreSQL repository for shortened URLs.
///
/// Uniqueness of `short_code` is enforced by the
/// `shortened_urls_short_code_key` constraint; a violating insert surfaces as
/// [`AppError::Conflict`].
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn get_by_code(&self, code: &str) -> Result<Option<ShortenedUrl>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "SELECT {URL_COLUMNS} FROM shortened_urls WHERE short_code = $1 AND is_active"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM shortened_urls WHERE short_code = $1)",
        )
        .bind(code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn add(&self, url: &ShortenedUrl) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO shortened_urls
                (id, original_url, short_code, created_at, expires_at, click_count, is_active, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(url.id())
        .bind(url.original_url())
        .bind(url.short_code())
        .bind(url.created_at())
        .bind(url.expires_at())
        .bind(url.click_count())
        .bind(url.is_active())
        .bind(url.created_by())
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn get_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<ShortenedUrl>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "SELECT {URL_COLUMNS} FROM shortened_urls \
             WHERE original_url = $1 AND is_active \
             ORDER BY created_at DESC \
             LIMIT 1"
        ))
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn deactivate(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE shortened_urls SET is_active = FALSE WHERE short_code = $1 AND is_active",
        )
        .bind(code)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
