//! Redirect workflow.
//!
//! [`RedirectorService`] resolves short codes through a read-only link
//! store. Unknown codes are a normal [`RedirectOutcome::NotFound`], not an
//! error; only store failures surface as [`RedirectorError`].

pub mod error;
pub mod redirector;
pub mod service;

pub use error::{RedirectorError, Result};
pub use redirector::{RedirectOutcome, Redirector};
pub use service::RedirectorService;
