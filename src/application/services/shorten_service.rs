//! Short URL creation and deactivation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tracing::{debug, info};

use super::unique_code::UniqueCodeResolver;
use super::url_cache::UrlCacheLayer;
use crate::domain::entities::ShortenedUrl;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::validate_custom_code;
use crate::utils::url_validator::validate_original_url;

/// Input for [`ShortenService::shorten`].
#[derive(Debug, Clone, Default)]
pub struct ShortenCommand {
    pub original_url: String,
    pub custom_code: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}

/// Result of a shorten call.
#[derive(Debug, Clone)]
pub struct ShortenOutcome {
    pub url: ShortenedUrl,
    /// `{base_url}/{short_code}`.
    pub short_url: String,
    /// `false` when an existing record for the same URL was returned.
    pub created: bool,
}

/// Service for creating and deactivating short URLs.
///
/// URLs are de-duplicated by exact original URL: while an active, unexpired
/// record exists for it, shortening it again returns that record.
pub struct ShortenService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    resolver: UniqueCodeResolver<R>,
    cache: Arc<UrlCacheLayer<R>>,
    base_url: String,
}

impl<R: UrlRepository + ?Sized> ShortenService<R> {
    /// Creates a new shorten service.
    ///
    /// A trailing slash on `base_url` is ignored.
    pub fn new(repository: Arc<R>, cache: Arc<UrlCacheLayer<R>>, base_url: &str) -> Self {
        Self {
            resolver: UniqueCodeResolver::new(repository.clone()),
            repository,
            cache,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Shortens a URL using a freshly seeded random generator.
    ///
    /// See [`Self::shorten_with_rng`].
    pub async fn shorten(&self, command: ShortenCommand) -> Result<ShortenOutcome, AppError> {
        let mut rng = StdRng::from_os_rng();
        self.shorten_with_rng(command, &mut rng).await
    }

    /// Shortens a URL, drawing random codes from `rng`.
    ///
    /// # Steps
    ///
    /// 1. Reject anything that is not an absolute URL
    /// 2. Return the newest active, unexpired record with the same URL, if any
    /// 3. Use `custom_code` verbatim, or generate a unique random code
    /// 4. Persist and return the new record
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an invalid URL, custom code or field
    /// - [`AppError::Conflict`] if the code is already taken at insert time
    /// - [`AppError::CodeGenerationExhausted`] if no free random code was found
    pub async fn shorten_with_rng<G: Rng + Send + ?Sized>(
        &self,
        command: ShortenCommand,
        rng: &mut G,
    ) -> Result<ShortenOutcome, AppError> {
        let ShortenCommand {
            original_url,
            custom_code,
            expires_at,
            created_by,
        } = command;

        validate_original_url(&original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        if let Some(existing) = self.repository.get_by_original_url(&original_url).await?
            && !existing.is_expired()
        {
            debug!(code = existing.short_code(), "Returning existing short URL");
            return Ok(self.outcome(existing, false));
        }

        let code = match custom_code {
            Some(custom) => {
                validate_custom_code(&custom)?;
                custom
            }
            None => self.resolver.generate_unique_code(rng).await?,
        };

        let url = ShortenedUrl::create(original_url, code, created_by, expires_at)?;
        self.repository.add(&url).await?;

        info!(
            code = url.short_code(),
            expires_at = ?url.expires_at(),
            "Short URL created"
        );

        Ok(self.outcome(url, true))
    }

    /// Soft-deletes the active record for `code` and drops its cache entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no active record matches.
    pub async fn deactivate(&self, code: &str) -> Result<(), AppError> {
        if !self.repository.deactivate(code).await? {
            return Err(AppError::not_found(
                "Short URL not found",
                json!({ "code": code }),
            ));
        }

        self.cache.invalidate(code).await;
        info!(code, "Short URL deactivated");

        Ok(())
    }

    /// Builds the public short URL for a code.
    pub fn short_url_for(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    fn outcome(&self, url: ShortenedUrl, created: bool) -> ShortenOutcome {
        ShortenOutcome {
            short_url: self.short_url_for(url.short_code()),
            url,
            created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use crate::infrastructure::cache::{MockCacheService, NullCache};
    use chrono::Duration;
    use mockall::predicate::eq;

    const BASE: &str = "https://sho.rt";

    fn service(repo: MockUrlRepository) -> ShortenService<MockUrlRepository> {
        let repo = Arc::new(repo);
        let cache = Arc::new(UrlCacheLayer::new(repo.clone(), Arc::new(NullCache::new())));
        ShortenService::new(repo, cache, BASE)
    }

    fn command(url: &str) -> ShortenCommand {
        ShortenCommand {
            original_url: url.to_string(),
            ..Default::default()
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[tokio::test]
    async fn test_shorten_generates_seven_char_code() {
        let mut repo = MockUrlRepository::new();
        repo.expect_get_by_original_url().times(1).returning(|_| Ok(None));
        repo.expect_exists_by_code().times(1).returning(|_| Ok(false));
        repo.expect_add()
            .withf(|url| url.original_url() == "https://example.com/a")
            .times(1)
            .returning(|_| Ok(()));

        let outcome = service(repo)
            .shorten_with_rng(command("https://example.com/a"), &mut rng())
            .await
            .unwrap();

        let code = outcome.url.short_code();
        assert_eq!(code.len(), 7);
        assert_eq!(outcome.short_url, format!("{BASE}/{code}"));
        assert!(outcome.created);
        assert!(outcome.url.is_active());
        assert_eq!(outcome.url.click_count(), 0);
    }

    #[tokio::test]
    async fn test_shorten_returns_existing_record() {
        let existing = ShortenedUrl::create("https://example.com/a", "exist01", None, None).unwrap();
        let expected_id = existing.id();

        let mut repo = MockUrlRepository::new();
        repo.expect_get_by_original_url()
            .with(eq("https://example.com/a"))
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_exists_by_code().times(0);
        repo.expect_add().times(0);

        let outcome = service(repo)
            .shorten_with_rng(command("https://example.com/a"), &mut rng())
            .await
            .unwrap();

        assert!(!outcome.created);
        assert_eq!(outcome.url.id(), expected_id);
        assert_eq!(outcome.short_url, "https://sho.rt/exist01");
    }

    #[tokio::test]
    async fn test_shorten_ignores_expired_duplicate() {
        let expired = ShortenedUrl::create(
            "https://example.com/a",
            "old0001",
            None,
            Some(Utc::now() - Duration::hours(1)),
        )
        .unwrap();

        let mut repo = MockUrlRepository::new();
        repo.expect_get_by_original_url()
            .returning(move |_| Ok(Some(expired.clone())));
        repo.expect_exists_by_code().returning(|_| Ok(false));
        repo.expect_add().times(1).returning(|_| Ok(()));

        let outcome = service(repo)
            .shorten_with_rng(command("https://example.com/a"), &mut rng())
            .await
            .unwrap();

        assert!(outcome.created);
        assert_ne!(outcome.url.short_code(), "old0001");
    }

    #[tokio::test]
    async fn test_shorten_invalid_url() {
        let mut repo = MockUrlRepository::new();
        repo.expect_get_by_original_url().times(0);

        let result = service(repo)
            .shorten_with_rng(command("not-a-url"), &mut rng())
            .await;

        match result {
            Err(AppError::Validation { message, .. }) => assert_eq!(message, "Invalid URL format"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_shorten_accepts_ftp_url() {
        let mut repo = MockUrlRepository::new();
        repo.expect_get_by_original_url().times(1).returning(|_| Ok(None));
        repo.expect_exists_by_code().times(1).returning(|_| Ok(false));
        repo.expect_add()
            .withf(|url| url.original_url() == "ftp://files.example.com/a.zip")
            .times(1)
            .returning(|_| Ok(()));

        let outcome = service(repo)
            .shorten_with_rng(command("ftp://files.example.com/a.zip"), &mut rng())
            .await
            .unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.url.original_url(), "ftp://files.example.com/a.zip");
    }

    #[tokio::test]
    async fn test_shorten_custom_code_used_verbatim() {
        let mut repo = MockUrlRepository::new();
        repo.expect_get_by_original_url().returning(|_| Ok(None));
        repo.expect_exists_by_code().times(0);
        repo.expect_add()
            .withf(|url| url.short_code() == "promo")
            .times(1)
            .returning(|_| Ok(()));

        let cmd = ShortenCommand {
            custom_code: Some("promo".to_string()),
            ..command("https://example.com/sale")
        };

        let outcome = service(repo).shorten_with_rng(cmd, &mut rng()).await.unwrap();

        assert_eq!(outcome.url.short_code(), "promo");
        assert_eq!(outcome.short_url, "https://sho.rt/promo");
    }

    #[tokio::test]
    async fn test_shorten_custom_code_conflict_from_store() {
        let mut repo = MockUrlRepository::new();
        repo.expect_get_by_original_url().returning(|_| Ok(None));
        repo.expect_add()
            .returning(|_| Err(AppError::conflict("Short code already exists", json!({}))));

        let cmd = ShortenCommand {
            custom_code: Some("taken".to_string()),
            ..command("https://example.com")
        };

        let result = service(repo).shorten_with_rng(cmd, &mut rng()).await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_shorten_invalid_custom_code() {
        let mut repo = MockUrlRepository::new();
        repo.expect_get_by_original_url().returning(|_| Ok(None));
        repo.expect_add().times(0);

        let cmd = ShortenCommand {
            custom_code: Some("way-too-long-code".to_string()),
            ..command("https://example.com")
        };

        let result = service(repo).shorten_with_rng(cmd, &mut rng()).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_shorten_exhausted() {
        let mut repo = MockUrlRepository::new();
        repo.expect_get_by_original_url().returning(|_| Ok(None));
        repo.expect_exists_by_code().times(10).returning(|_| Ok(true));
        repo.expect_add().times(0);

        let result = service(repo)
            .shorten_with_rng(command("https://example.com"), &mut rng())
            .await;

        assert!(matches!(
            result,
            Err(AppError::CodeGenerationExhausted { .. })
        ));
    }

    #[tokio::test]
    async fn test_shorten_keeps_expiry_and_creator() {
        let expires = Utc::now() + Duration::days(3);

        let mut repo = MockUrlRepository::new();
        repo.expect_get_by_original_url().returning(|_| Ok(None));
        repo.expect_exists_by_code().returning(|_| Ok(false));
        repo.expect_add().returning(|_| Ok(()));

        let cmd = ShortenCommand {
            expires_at: Some(expires),
            created_by: Some("alice".to_string()),
            ..command("https://example.com")
        };

        let outcome = service(repo).shorten_with_rng(cmd, &mut rng()).await.unwrap();

        assert_eq!(outcome.url.expires_at(), Some(expires));
        assert_eq!(outcome.url.created_by(), Some("alice"));
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash() {
        let repo = Arc::new(MockUrlRepository::new());
        let cache = Arc::new(UrlCacheLayer::new(repo.clone(), Arc::new(NullCache::new())));
        let service = ShortenService::new(repo, cache, "http://localhost:3000/");

        assert_eq!(service.short_url_for("abc"), "http://localhost:3000/abc");
    }

    #[tokio::test]
    async fn test_deactivate_invalidates_cache() {
        let mut repo = MockUrlRepository::new();
        repo.expect_deactivate()
            .with(eq("abc1234"))
            .times(1)
            .returning(|_| Ok(true));

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .with(eq("url:abc1234"))
            .times(1)
            .returning(|_| Ok(()));

        let repo = Arc::new(repo);
        let layer = Arc::new(UrlCacheLayer::new(repo.clone(), Arc::new(cache)));
        let service = ShortenService::new(repo, layer, BASE);

        service.deactivate("abc1234").await.unwrap();
    }

    #[tokio::test]
    async fn test_deactivate_missing() {
        let mut repo = MockUrlRepository::new();
        repo.expect_deactivate().returning(|_| Ok(false));

        let result = service(repo).deactivate("nope").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }
}
