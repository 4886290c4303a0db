//! PostgreSQL implementation of the analytics repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::ClickAnalytics;
use crate::domain::repositories::{AnalyticsRepository, DailyClickCount, UrlAnalytics};
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: uuid::Uuid,
    short_code: String,
    original_url: String,
    click_count: i64,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct DailyRow {
    day: NaiveDate,
    clicks: i64,
}

/// PostgreSQL repository for click tracking.
pub struct PgAnalyticsRepository {
    pool: Arc<PgPool>,
}

impl PgAnalyticsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    async fn record_click(&self, click: &ClickAnalytics) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE shortened_urls SET click_count = click_count + 1 WHERE id = $1",
        )
        .bind(click.shortened_url_id())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::not_found(
                "Short URL not found",
                json!({ "id": click.shortened_url_id() }),
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO click_analytics
                (id, shortened_url_id, ip_address, user_agent, referrer, clicked_at, country, city)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(click.id())
        .bind(click.shortened_url_id())
        .bind(click.ip_address())
        .bind(click.user_agent())
        .bind(click.referrer())
        .bind(click.clicked_at())
        .bind(click.country())
        .bind(click.city())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_url_analytics(&self, code: &str) -> Result<Option<UrlAnalytics>, AppError> {
        let Some(summary) = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT id, short_code, original_url, click_count, created_at
            FROM shortened_urls
            WHERE short_code = $1 AND is_active
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?
        else {
            return Ok(None);
        };

        let daily = sqlx::query_as::<_, DailyRow>(
            r#"
            SELECT (clicked_at AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS clicks
            FROM click_analytics
            WHERE shortened_url_id = $1
            GROUP BY day
            ORDER BY day ASC
            "#,
        )
        .bind(summary.id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(Some(UrlAnalytics {
            short_code: summary.short_code,
            original_url: summary.original_url,
            total_clicks: summary.click_count,
            created_at: summary.created_at,
            daily_clicks: daily
                .into_iter()
                .map(|row| DailyClickCount {
                    date: row.day,
                    count: row.clicks,
                })
                .collect(),
        }))
    }
}
