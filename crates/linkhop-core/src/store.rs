use crate::error::StorageError;
use crate::link::Link;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of a link store.
///
/// This trait provides only the read operations from [`LinkStore`],
/// allowing services like the redirector to have read-only access.
#[async_trait]
pub trait ReadLinkStore: Send + Sync + 'static {
    /// Returns the first link created for `original_url`, if any.
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<Link>>;

    /// Returns the link for a given short code.
    /// Returns `None` if the code does not exist.
    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<Link>>;

    /// Checks whether a short code already exists in the store.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;
}

#[async_trait]
pub trait LinkStore: ReadLinkStore {
    /// Inserts a new link and returns it with its assigned id.
    ///
    /// Returns `Err(StorageError::Conflict)` if the short code is already
    /// taken. A failed insert leaves no partial record behind.
    async fn create(&self, original_url: &str, code: &ShortCode) -> Result<Link>;
}

/// Stores with a persistent schema that must exist before use.
#[async_trait]
pub trait SchemaBootstrap: Send + Sync {
    /// Creates the links table and its indexes if they are absent.
    ///
    /// Safe to run any number of times.
    async fn init_schema(&self) -> Result<()>;
}
