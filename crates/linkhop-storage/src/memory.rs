use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use linkhop_core::store::{LinkStore, ReadLinkStore, Result, SchemaBootstrap};
use linkhop_core::{Link, ShortCode, StorageError};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::trace;

/// In-memory implementation of the link store using DashMap.
///
/// Links are keyed by short code. A second map indexes the lowest-id link
/// per original URL. DashMap's sharded locks let requests for different
/// codes proceed without blocking each other, and the entry API makes the
/// uniqueness check and the insert a single atomic step.
#[derive(Debug)]
pub struct InMemoryLinkStore {
    by_code: DashMap<String, Link>,
    by_url: DashMap<String, (i64, ShortCode)>,
    next_id: AtomicI64,
}

impl InMemoryLinkStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_code: DashMap::with_capacity(capacity),
            by_url: DashMap::with_capacity(capacity),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl Default for InMemoryLinkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadLinkStore for InMemoryLinkStore {
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<Link>> {
        // Release the url shard before touching the code map.
        let Some(code) = self.by_url.get(original_url).map(|entry| entry.1.clone()) else {
            return Ok(None);
        };

        Ok(self.by_code.get(code.as_str()).map(|link| link.clone()))
    }

    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<Link>> {
        Ok(self.by_code.get(code.as_str()).map(|link| link.clone()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.by_code.contains_key(code.as_str()))
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn create(&self, original_url: &str, code: &ShortCode) -> Result<Link> {
        let link = match self.by_code.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => return Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                let link = Link {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst),
                    original_url: original_url.to_owned(),
                    short_code: code.clone(),
                };

                // The url index is updated while the code shard is still
                // locked, so a link visible by code is also visible by url.
                // Lock order is always code shard then url shard.
                match self.by_url.entry(original_url.to_owned()) {
                    Entry::Occupied(mut existing) => {
                        if existing.get().0 > link.id {
                            existing.insert((link.id, code.clone()));
                        }
                    }
                    Entry::Vacant(url_slot) => {
                        url_slot.insert((link.id, code.clone()));
                    }
                }

                slot.insert(link.clone());
                link
            }
        };

        trace!(code = %code, id = link.id, "stored link in memory");
        Ok(link)
    }
}

#[async_trait]
impl SchemaBootstrap for InMemoryLinkStore {
    async fn init_schema(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn create_and_find_by_short_code() {
        let store = InMemoryLinkStore::new();

        let created = store
            .create("https://example.com", &code("abc123"))
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let found = store.find_by_short_code(&code("abc123")).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn find_by_original_url() {
        let store = InMemoryLinkStore::new();

        store
            .create("https://example.com", &code("abc123"))
            .await
            .unwrap();

        let found = store
            .find_by_original_url("https://example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.short_code, code("abc123"));

        assert!(store
            .find_by_original_url("https://other.example")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn first_link_wins_for_duplicate_urls() {
        let store = InMemoryLinkStore::new();

        store.create("https://example.com", &code("first")).await.unwrap();
        store.create("https://example.com", &code("second")).await.unwrap();

        let found = store
            .find_by_original_url("https://example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.short_code, code("first"));
    }

    #[tokio::test]
    async fn find_nonexistent() {
        let store = InMemoryLinkStore::new();

        assert!(store.find_by_short_code(&code("zzzzzz")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_conflict_leaves_original_untouched() {
        let store = InMemoryLinkStore::new();

        store
            .create("https://example.com", &code("abc123"))
            .await
            .unwrap();

        let err = store
            .create("https://other.com", &code("abc123"))
            .await
            .unwrap_err();
        assert_eq!(err, StorageError::Conflict("abc123".to_string()));

        let found = store.find_by_short_code(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(found.original_url, "https://example.com");
        assert!(store
            .find_by_original_url("https://other.com")
            .await
            .unwrap()
            .is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn short_codes_are_case_sensitive() {
        let store = InMemoryLinkStore::new();

        store.create("https://a.example", &code("abc")).await.unwrap();
        store.create("https://b.example", &code("ABC")).await.unwrap();

        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn ids_increase() {
        let store = InMemoryLinkStore::new();

        let first = store.create("https://a.example", &code("a")).await.unwrap();
        let second = store.create("https://b.example", &code("b")).await.unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn exists_checks() {
        let store = InMemoryLinkStore::new();

        assert!(!store.exists(&code("abc123")).await.unwrap());

        store
            .create("https://example.com", &code("abc123"))
            .await
            .unwrap();

        assert!(store.exists(&code("abc123")).await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_creates_for_one_code_have_a_single_winner() {
        let store = Arc::new(InMemoryLinkStore::new());
        let mut handles = vec![];

        for i in 0..32u64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .create(&format!("https://example{}.com", i), &code("race"))
                    .await
            }));
        }

        let mut winners = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(StorageError::Conflict(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(conflicts, 31);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_access() {
        let store = Arc::new(InMemoryLinkStore::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let c = ShortCode::new_unchecked(format!("code{:03}", i));
                store
                    .create(&format!("https://example{}.com", i), &c)
                    .await
                    .unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..10u64 {
            let c = ShortCode::new_unchecked(format!("code{:03}", i));
            let link = store.find_by_short_code(&c).await.unwrap().unwrap();
            assert_eq!(link.original_url, format!("https://example{}.com", i));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn link_visible_by_code_is_visible_by_url() {
        let store = Arc::new(InMemoryLinkStore::new());

        let writer = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                for i in 0..500u64 {
                    let c = ShortCode::new_unchecked(format!("w{:04}", i));
                    store
                        .create(&format!("https://example.com/{}", i), &c)
                        .await
                        .unwrap();
                }
            })
        };

        for i in 0..500u64 {
            let c = ShortCode::new_unchecked(format!("w{:04}", i));
            while store.find_by_short_code(&c).await.unwrap().is_none() {
                tokio::task::yield_now().await;
            }

            let by_url = store
                .find_by_original_url(&format!("https://example.com/{}", i))
                .await
                .unwrap();
            assert_eq!(by_url.map(|link| link.short_code), Some(c));
        }

        writer.await.unwrap();
    }
}
