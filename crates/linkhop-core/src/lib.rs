//! Core types and traits for the linkhop URL shortener.
//!
//! This crate provides the link model, the validated short code type, the
//! store contracts and the URL validator shared by the shortener, the
//! redirector and the storage backends.

pub mod error;
pub mod link;
pub mod shortcode;
pub mod shortener;
pub mod store;
pub mod validation;

pub use error::{CoreError, ShortenerError, StorageError};
pub use link::{Link, MAX_URL_LENGTH};
pub use shortcode::{ShortCode, MAX_SHORT_CODE_LENGTH};
pub use shortener::{ShortenOutcome, Shortened, Shortener};
pub use store::{LinkStore, ReadLinkStore, SchemaBootstrap};
pub use validation::{is_valid_url, validate_url, UrlError};
