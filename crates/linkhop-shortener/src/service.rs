use async_trait::async_trait;
use linkhop_core::{
    validate_url, Link, LinkStore, ReadLinkStore, ShortCode, ShortenOutcome, Shortened,
    Shortener, ShortenerError, StorageError, MAX_URL_LENGTH,
};
use linkhop_generator::Generator;
use std::sync::Arc;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_CODE_ATTEMPTS: usize = 5;
pub const DEFAULT_MAX_INSERT_ATTEMPTS: usize = 5;

/// Retry limits for the shortening workflow.
///
/// Values below one are treated as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct ShortenerSettings {
    /// Candidate codes tried per allocation before giving up on finding an
    /// unused one.
    #[builder(default = DEFAULT_MAX_CODE_ATTEMPTS)]
    pub max_code_attempts: usize,
    /// Inserts tried per request when a freshly allocated code turns out to
    /// be taken by a concurrent insert.
    #[builder(default = DEFAULT_MAX_INSERT_ATTEMPTS)]
    pub max_insert_attempts: usize,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the [`Shortener`] trait.
///
/// This service wraps a [`LinkStore`] and a [`Generator`] to handle:
/// - URL validation
/// - idempotent re-shortening of known URLs
/// - allocation of codes not yet present in the store
/// - retrying with a new code when an insert loses a uniqueness race
///
/// The existence checks only narrow the race window; the store's uniqueness
/// constraint decides which insert wins.
#[derive(Debug)]
pub struct ShortenerService<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    settings: ShortenerSettings,
}

impl<S, G> Clone for ShortenerService<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            settings: self.settings,
        }
    }
}

impl<S: LinkStore, G: Generator> ShortenerService<S, G> {
    /// Creates a new `ShortenerService` with default retry limits.
    pub fn new(store: Arc<S>, generator: G) -> Self {
        Self::with_settings(store, generator, ShortenerSettings::default())
    }

    pub fn with_settings(store: Arc<S>, generator: G, settings: ShortenerSettings) -> Self {
        Self {
            store,
            generator: Arc::new(generator),
            settings,
        }
    }

    /// Returns the store this service writes to.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        validate_url(url).map_err(|e| ShortenerError::InvalidUrl(e.to_string()))?;

        let length = url.chars().count();
        if length > MAX_URL_LENGTH {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must be at most {} characters, got {}",
                MAX_URL_LENGTH, length
            )));
        }

        Ok(())
    }

    /// Draws candidates from the generator until one is absent from the store.
    ///
    /// The returned code is not reserved; it must be persisted right away.
    async fn allocate_code(&self) -> Result<ShortCode, ShortenerError> {
        let attempts = self.settings.max_code_attempts.max(1);

        for attempt in 1..=attempts {
            let candidate = self.generator.generate();
            if !self
                .store
                .exists(&candidate)
                .await
                .map_err(persistence_error)?
            {
                return Ok(candidate);
            }
            debug!(code = %candidate, attempt, "generated short code already taken");
        }

        warn!(attempts, "could not find an unused short code");
        Err(ShortenerError::CodeSpaceExhausted { attempts })
    }

    async fn existing_link(&self, url: &str) -> Result<Option<Link>, ShortenerError> {
        self.store
            .find_by_original_url(url)
            .await
            .map_err(persistence_error)
    }
}

#[async_trait]
impl<S: LinkStore, G: Generator> Shortener for ShortenerService<S, G> {
    async fn shorten(&self, original_url: &str) -> Result<Shortened, ShortenerError> {
        Self::validate_url(original_url)?;

        if let Some(link) = self.existing_link(original_url).await? {
            debug!(code = %link.short_code, "url was shortened before");
            return Ok(Shortened {
                link,
                outcome: ShortenOutcome::Existing,
            });
        }

        let attempts = self.settings.max_insert_attempts.max(1);
        for attempt in 1..=attempts {
            let code = self.allocate_code().await?;

            match self.store.create(original_url, &code).await {
                Ok(link) => {
                    info!(code = %link.short_code, id = link.id, "shortened url");
                    return Ok(Shortened {
                        link,
                        outcome: ShortenOutcome::Created,
                    });
                }
                Err(StorageError::Conflict(_)) => {
                    warn!(code = %code, attempt, "short code taken by a concurrent insert");

                    // A concurrent request for the same URL may have won the race.
                    if let Some(link) = self.existing_link(original_url).await? {
                        return Ok(Shortened {
                            link,
                            outcome: ShortenOutcome::Existing,
                        });
                    }
                }
                Err(err) => return Err(persistence_error(err)),
            }
        }

        warn!(attempts, "gave up after repeated short code conflicts");
        Err(ShortenerError::Storage(format!(
            "short code conflicts persisted after {} attempts",
            attempts
        )))
    }

    async fn resolve(&self, code: &ShortCode) -> Result<Option<Link>, ShortenerError> {
        self.store
            .find_by_short_code(code)
            .await
            .map_err(persistence_error)
    }
}

// Callers turn the returned error into a response and log it there.
fn persistence_error(err: StorageError) -> ShortenerError {
    warn!(error = %err, "link store operation failed");
    ShortenerError::from(err)
}
