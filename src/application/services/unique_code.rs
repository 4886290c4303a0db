//! Collision-checked random code generation.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, warn};

use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code};

/// Draws random codes until one is not present in the store.
///
/// The existence check and the later insert are separate calls, so two
/// concurrent requests can still pick the same code. The store's unique
/// constraint rejects the second insert with [`AppError::Conflict`].
pub struct UniqueCodeResolver<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    code_length: usize,
}

impl<R: UrlRepository + ?Sized> UniqueCodeResolver<R> {
    /// Number of candidates tried before giving up.
    pub const MAX_ATTEMPTS: usize = 10;

    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            code_length: DEFAULT_CODE_LENGTH,
        }
    }

    /// Returns a code that no stored record, active or not, currently uses.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeGenerationExhausted`] after
    /// [`Self::MAX_ATTEMPTS`] collisions, or the store's error if an
    /// existence check fails.
    pub async fn generate_unique_code<G: Rng + Send + ?Sized>(
        &self,
        rng: &mut G,
    ) -> Result<String, AppError> {
        for attempt in 1..=Self::MAX_ATTEMPTS {
            let code = generate_code(rng, self.code_length);

            if !self.repository.exists_by_code(&code).await? {
                return Ok(code);
            }

            debug!(attempt, code = %code, "Short code collision");
        }

        warn!(
            attempts = Self::MAX_ATTEMPTS,
            "Exhausted short code generation attempts"
        );

        Err(AppError::CodeGenerationExhausted {
            attempts: Self::MAX_ATTEMPTS,
        })
    }
}
