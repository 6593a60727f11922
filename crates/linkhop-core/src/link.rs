use crate::shortcode::ShortCode;
use serde::{Deserialize, Serialize};

/// Longest original URL a link may point at.
pub const MAX_URL_LENGTH: usize = 2048;

/// A stored mapping between an original URL and its short code.
///
/// Links are written once and never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Identifier assigned by the store, increasing with insertion order.
    pub id: i64,
    /// The original URL that was shortened.
    pub original_url: String,
    /// The unique short code pointing at `original_url`.
    pub short_code: ShortCode,
}
