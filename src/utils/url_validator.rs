//! Destination URL validation
//!
//! Syntactic only: the target is never fetched.

use url::Url;

#[derive(Debug)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    MissingHost,
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "destination cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "destination scheme '{}' is not allowed, use http or https",
                proto
            ),
            Self::MissingHost => write!(f, "destination has no host"),
            Self::InvalidFormat(msg) => write!(f, "invalid destination URL: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// Absolute `http://` or `https://` URL with a host
pub fn validate_destination(destination: &str) -> Result<Url, UrlValidationError> {
    let destination = destination.trim();

    if destination.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let url =
        Url::parse(destination).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    // Url::parse 已把 scheme 转为小写
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlValidationError::InvalidProtocol(url.scheme().to_string()));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}
