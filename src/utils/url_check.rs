//! Target URL validation.
//!
//! Target URLs are stored exactly as submitted (after trimming), since the
//! `(original_url, seller_id)` dedup lookup compares them verbatim. This
//! module only rejects input that cannot be redirected to.

use url::Url;

/// Reasons a target URL is rejected.
#[derive(Debug, thiserror::Error)]
pub enum UrlCheckError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Checks that `input` is an absolute `http`/`https` URL with a host.
///
/// # Errors
///
/// Returns [`UrlCheckError::InvalidFormat`] for malformed URLs,
/// [`UrlCheckError::UnsupportedProtocol`] for other schemes such as
/// `javascript:` or `file:`, and [`UrlCheckError::MissingHost`] otherwise.
pub fn check_target_url(input: &str) -> Result<(), UrlCheckError> {
    let url = Url::parse(input).map_err(|e| UrlCheckError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlCheckError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlCheckError::MissingHost);
    }

    Ok(())
}
