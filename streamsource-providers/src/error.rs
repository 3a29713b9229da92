//! Shared provider client error types
//!
//! Common error enum and response helpers used by every HTTP client in this crate
//! (consumet-style provider API, TMDB).

use thiserror::Error;

pub use reqwest::StatusCode;

/// Maximum response body size for provider HTTP calls (8 MB).
/// Search and source listings are small JSON documents; anything larger is a misbehaving upstream.
pub const MAX_RESPONSE_SIZE: usize = 8 * 1024 * 1024;

/// Common error type for all provider HTTP clients.
#[derive(Debug, Error)]
pub enum ProviderClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP error {status} for {url}")]
    Http { status: StatusCode, url: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Response too large ({size} bytes, max {MAX_RESPONSE_SIZE})")]
    ResponseTooLarge { size: u64 },
}

impl ProviderClientError {
    /// Whether the upstream answered 404 for the requested resource.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Read a response body with size limit and deserialize as JSON.
///
/// Checks `Content-Length` hint first (if available), then enforces the
/// limit on the actual body bytes before deserializing.
pub async fn json_with_limit<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ProviderClientError> {
    if let Some(cl) = response.content_length() {
        if cl as usize > MAX_RESPONSE_SIZE {
            return Err(ProviderClientError::ResponseTooLarge { size: cl });
        }
    }
    let bytes = response.bytes().await?;
    if bytes.len() > MAX_RESPONSE_SIZE {
        return Err(ProviderClientError::ResponseTooLarge { size: bytes.len() as u64 });
    }
    serde_json::from_slice(&bytes).map_err(Into::into)
}

/// Check HTTP response status before processing body.
pub fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ProviderClientError> {
    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(ProviderClientError::Http {
            status,
            url: resp.url().to_string(),
        });
    }
    Ok(resp)
}

/// Join a configured base URL and a relative API path.
pub(crate) fn join_url(base: &url::Url, path: &str) -> Result<url::Url, ProviderClientError> {
    base.join(path)
        .map_err(|e| ProviderClientError::InvalidConfig(format!("cannot join {path} onto {base}: {e}")))
}

/// Parse a base URL, forcing a trailing slash so relative joins keep the full path.
pub(crate) fn parse_base_url(raw: &str) -> Result<url::Url, ProviderClientError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    url::Url::parse(&normalized)
        .map_err(|e| ProviderClientError::InvalidConfig(format!("invalid base URL {raw}: {e}")))
}

impl From<reqwest::Error> for ProviderClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_network() {
        let err = ProviderClientError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn test_error_display_http() {
        let err = ProviderClientError::Http {
            status: reqwest::StatusCode::NOT_FOUND,
            url: "https://example.com/api".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 404 Not Found for https://example.com/api");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_server_error_is_not_not_found() {
        let err = ProviderClientError::Http {
            status: reqwest::StatusCode::BAD_GATEWAY,
            url: "https://example.com/api".to_string(),
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_display_response_too_large() {
        let err = ProviderClientError::ResponseTooLarge { size: 20_000_000 };
        let msg = err.to_string();
        assert!(msg.contains("20000000"));
        assert!(msg.contains(&MAX_RESPONSE_SIZE.to_string()));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ProviderClientError = json_err.into();
        assert!(matches!(err, ProviderClientError::Parse(_)));
    }

    #[test]
    fn test_parse_base_url_keeps_path_prefix() {
        let base = parse_base_url("https://api.example.com/v1").unwrap();
        let joined = join_url(&base, "movies/flixhq/info").unwrap();
        assert_eq!(joined.as_str(), "https://api.example.com/v1/movies/flixhq/info");
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        let err = parse_base_url("not a url").unwrap_err();
        assert!(matches!(err, ProviderClientError::InvalidConfig(_)));
    }
}
