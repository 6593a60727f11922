use crate::error::ShortenerError;
use crate::link::Link;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ShortenerError>;

/// Whether a shortening request produced a new link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortenOutcome {
    /// A new link was persisted.
    Created,
    /// The URL had been shortened before; the existing link is returned.
    Existing,
}

/// The result of a successful shortening request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    pub link: Link,
    pub outcome: ShortenOutcome,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens `original_url`, reusing the existing link when there is one.
    async fn shorten(&self, original_url: &str) -> Result<Shortened>;

    /// Retrieves the link associated with the given short code.
    async fn resolve(&self, code: &ShortCode) -> Result<Option<Link>>;
}
