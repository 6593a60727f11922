use crate::Result;
use async_trait::async_trait;
use linkhop_core::{Link, ShortCode};

/// What the web layer should do with a requested short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// Send the visitor to `link.original_url`.
    Redirect(Link),
    /// No link exists for the requested code (kept verbatim for messages).
    NotFound(String),
}

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a short code to its stored link.
    /// Returns `None` if the code does not exist.
    async fn resolve(&self, code: &ShortCode) -> Result<Option<Link>>;

    /// Resolves a raw path segment.
    ///
    /// Segments that cannot be short codes resolve to
    /// [`RedirectOutcome::NotFound`] without touching the store.
    async fn lookup(&self, raw_code: &str) -> Result<RedirectOutcome> {
        let Ok(code) = ShortCode::new(raw_code) else {
            return Ok(RedirectOutcome::NotFound(raw_code.to_owned()));
        };

        Ok(match self.resolve(&code).await? {
            Some(link) => RedirectOutcome::Redirect(link),
            None => RedirectOutcome::NotFound(raw_code.to_owned()),
        })
    }
}
