use chrono::{Duration, Utc};
use shortcut::domain::entities::ShortenedUrl;
use shortcut::domain::repositories::UrlRepository;
use shortcut::error::AppError;
use shortcut::infrastructure::persistence::PgUrlRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_url(code: &str, original_url: &str) -> ShortenedUrl {
    ShortenedUrl::create(original_url, code, Some("tests".to_string()), None).unwrap()
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_add_and_get_by_code(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    let url = new_url("abc1234", "https://example.com");

    repo.add(&url).await.unwrap();

    let found = repo.get_by_code("abc1234").await.unwrap().unwrap();
    assert_eq!(found.id(), url.id());
    assert_eq!(found.original_url(), "https://example.com");
    assert_eq!(found.created_by(), Some("tests"));
    assert_eq!(found.click_count(), 0);
    assert!(found.is_active());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_get_by_code_is_case_sensitive(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    repo.add(&new_url("AbC", "https://example.com")).await.unwrap();

    assert!(repo.get_by_code("abc").await.unwrap().is_none());
    assert!(repo.get_by_code("AbC").await.unwrap().is_some());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_duplicate_code_is_conflict(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    repo.add(&new_url("dup", "https://example.com/a")).await.unwrap();

    let result = repo.add(&new_url("dup", "https://example.com/b")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_get_by_original_url_returns_newest_active(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    let older = new_url("old", "https://example.com/same");
    repo.add(&older).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let newer = new_url("new", "https://example.com/same");
    repo.add(&newer).await.unwrap();

    let found = repo
        .get_by_original_url("https://example.com/same")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.short_code(), "new");

    repo.deactivate("new").await.unwrap();
    let found = repo
        .get_by_original_url("https://example.com/same")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.short_code(), "old");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_deactivate_keeps_code_reserved(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    repo.add(&new_url("bye", "https://example.com")).await.unwrap();

    assert!(repo.deactivate("bye").await.unwrap());
    assert!(!repo.deactivate("bye").await.unwrap());
    assert!(!repo.deactivate("never").await.unwrap());

    assert!(repo.get_by_code("bye").await.unwrap().is_none());
    assert!(repo.exists_by_code("bye").await.unwrap());
    assert!(!repo.exists_by_code("never").await.unwrap());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_expiry_round_trips(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    let expires = Utc::now() - Duration::minutes(5);
    let url = ShortenedUrl::create("https://example.com", "exp", None, Some(expires)).unwrap();
    repo.add(&url).await.unwrap();

    let found = repo.get_by_code("exp").await.unwrap().unwrap();
    assert!(found.is_expired());
    assert_eq!(
        found.expires_at().map(|t| t.timestamp_micros()),
        Some(expires.timestamp_micros())
    );
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_ping(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    assert!(repo.ping().await.is_ok());
}
