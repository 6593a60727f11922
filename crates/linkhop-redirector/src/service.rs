use std::sync::Arc;

use crate::redirector::Redirector;
use crate::{RedirectOutcome, Result};
use async_trait::async_trait;
use linkhop_core::{Link, ReadLinkStore, ShortCode};
use tracing::{debug, trace};

/// Service for handling URL redirects.
///
/// Uses a read-only store to fetch links.
#[derive(Debug)]
pub struct RedirectorService<S> {
    store: Arc<S>,
}

impl<S> Clone for RedirectorService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ReadLinkStore> RedirectorService<S> {
    /// Creates a new RedirectorService reading from the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolves a raw short code to a redirect decision.
    ///
    /// # Returns
    ///
    /// * `Ok(RedirectOutcome::Redirect(link))` - The code maps to a link
    /// * `Ok(RedirectOutcome::NotFound(code))` - The code is unknown or malformed
    /// * `Err(e)` - If there was an error accessing the store
    pub async fn lookup(&self, raw_code: &str) -> Result<RedirectOutcome> {
        Redirector::lookup(self, raw_code).await
    }
}

#[async_trait]
impl<S: ReadLinkStore> Redirector for RedirectorService<S> {
    async fn resolve(&self, code: &ShortCode) -> Result<Option<Link>> {
        trace!(code = %code, "resolving short code");

        match self.store.find_by_short_code(code).await? {
            Some(link) => {
                debug!(code = %code, url = %link.original_url, "resolved short code");
                Ok(Some(link))
            }
            None => {
                trace!(code = %code, "short code not found");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RedirectorError;
    use async_trait::async_trait;
    use linkhop_core::StorageError;
    use linkhop_storage::{InMemoryLinkStore, LinkStore};

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    async fn setup_with_link(code: &ShortCode, url: &str) -> RedirectorService<InMemoryLinkStore> {
        let store = InMemoryLinkStore::new();
        store.create(url, code).await.unwrap();
        RedirectorService::new(Arc::new(store))
    }

    struct BrokenStore;

    #[async_trait]
    impl ReadLinkStore for BrokenStore {
        async fn find_by_original_url(&self, _: &str) -> linkhop_core::store::Result<Option<Link>> {
            Err(StorageError::Unavailable("down".to_string()))
        }

        async fn find_by_short_code(
            &self,
            _: &ShortCode,
        ) -> linkhop_core::store::Result<Option<Link>> {
            Err(StorageError::Unavailable("down".to_string()))
        }

        async fn exists(&self, _: &ShortCode) -> linkhop_core::store::Result<bool> {
            Err(StorageError::Unavailable("down".to_string()))
        }
    }

    #[tokio::test]
    async fn resolve_existing_code() {
        let c = code("AbC123");
        let service = setup_with_link(&c, "https://example.com/very/long/path").await;

        let link = service.resolve(&c).await.unwrap().expect("link should exist");
        assert_eq!(link.original_url, "https://example.com/very/long/path");
    }

    #[tokio::test]
    async fn resolve_nonexistent_code() {
        let service = RedirectorService::new(Arc::new(InMemoryLinkStore::new()));

        assert!(service.resolve(&code("zzzzzz")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lookup_redirects_known_code() {
        let c = code("AbC123");
        let service = setup_with_link(&c, "https://example.com").await;

        let outcome = service.lookup("AbC123").await.unwrap();
        match outcome {
            RedirectOutcome::Redirect(link) => {
                assert_eq!(link.original_url, "https://example.com")
            }
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn lookup_unknown_code_is_not_found() {
        let c = code("AbC123");
        let service = setup_with_link(&c, "https://example.com").await;

        assert_eq!(
            service.lookup("nosuch").await.unwrap(),
            RedirectOutcome::NotFound("nosuch".to_string())
        );
        // Codes are case-sensitive.
        assert_eq!(
            service.lookup("abc123").await.unwrap(),
            RedirectOutcome::NotFound("abc123".to_string())
        );
    }

    #[tokio::test]
    async fn lookup_malformed_code_skips_the_store() {
        let service = RedirectorService::new(Arc::new(BrokenStore));

        assert_eq!(
            service.lookup("not-a-code").await.unwrap(),
            RedirectOutcome::NotFound("not-a-code".to_string())
        );
        assert_eq!(
            service.lookup("waytoolongcode").await.unwrap(),
            RedirectOutcome::NotFound("waytoolongcode".to_string())
        );
    }

    #[tokio::test]
    async fn storage_failures_surface_as_errors() {
        let service = RedirectorService::new(Arc::new(BrokenStore));

        let err = service.lookup("abc123").await.unwrap_err();
        assert!(matches!(err, RedirectorError::Storage(StorageError::Unavailable(_))));
    }
}
