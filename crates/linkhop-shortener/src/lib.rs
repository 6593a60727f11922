//! URL shortening workflow.
//!
//! [`ShortenerService`] validates submitted URLs, reuses existing links for
//! URLs shortened before, and otherwise allocates a fresh code that is not
//! yet in the store before persisting a new link.

pub mod service;

pub use service::{ShortenerService, ShortenerSettings};
