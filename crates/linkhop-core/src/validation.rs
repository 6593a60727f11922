//! Acceptance rules for submitted URLs.

use thiserror::Error;
use url::Url;

/// Why a submitted string is not an acceptable original URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("URL cannot be empty")]
    Empty,
    #[error("URL is malformed: {0}")]
    Malformed(String),
    #[error("URL scheme must be http or https, got '{0}'")]
    UnsupportedScheme(String),
    #[error("URL must include a host")]
    MissingHost,
}

/// Returns `true` when `input` is an absolute `http`/`https` URL with a host.
///
/// Malformed input is rejected, never reported as a failure.
pub fn is_valid_url(input: &str) -> bool {
    validate_url(input).is_ok()
}

/// Checks `input` against the same rules as [`is_valid_url`], keeping the reason.
pub fn validate_url(input: &str) -> Result<(), UrlError> {
    if input.trim().is_empty() {
        return Err(UrlError::Empty);
    }

    if input.trim() != input {
        return Err(UrlError::Malformed(
            "leading or trailing whitespace".to_string(),
        ));
    }

    let parsed = Url::parse(input).map_err(|e| UrlError::Malformed(e.to_string()))?;

    // The parser lowercases the scheme.
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(UrlError::UnsupportedScheme(scheme.to_string()));
    }

    // The parser repairs `http:example.com` and `http:///example.com` into URLs
    // with a host; require the authority to be present in the input itself.
    let has_authority = input
        .trim()
        .split_once(':')
        .and_then(|(_, rest)| rest.strip_prefix("//"))
        .is_some_and(|authority| {
            !authority.is_empty() && !authority.starts_with(['/', '?', '#'])
        });
    if !has_authority || parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(())
}
