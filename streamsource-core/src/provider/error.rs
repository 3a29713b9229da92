// Provider Error Types

use streamsource_providers::ProviderClientError;

/// Errors raised by a provider adapter call
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Upstream timed out: {0}")]
    UpstreamTimeout(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Provider API error: {0}")]
    ApiError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<ProviderClientError> for ProviderError {
    fn from(err: ProviderClientError) -> Self {
        match err {
            e if e.is_not_found() => Self::NotFound,
            ProviderClientError::Network(msg) => Self::NetworkError(msg),
            ProviderClientError::Timeout(msg) => Self::UpstreamTimeout(msg),
            ProviderClientError::Parse(msg) => Self::ParseError(msg),
            ProviderClientError::InvalidConfig(msg) => Self::InvalidConfig(msg),
            ProviderClientError::InvalidInput(msg) => Self::InvalidInput(msg),
            e @ (ProviderClientError::Http { .. } | ProviderClientError::ResponseTooLarge { .. }) => {
                Self::ApiError(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_404_maps_to_not_found() {
        let err: ProviderError = ProviderClientError::Http {
            status: reqwest_status(404),
            url: "https://api.example.com/movies/flixhq/info".to_string(),
        }
        .into();
        assert!(matches!(err, ProviderError::NotFound));
    }

    #[test]
    fn test_client_502_maps_to_api_error() {
        let err: ProviderError = ProviderClientError::Http {
            status: reqwest_status(502),
            url: "https://api.example.com/movies/flixhq/watch".to_string(),
        }
        .into();
        assert!(matches!(err, ProviderError::ApiError(ref msg) if msg.contains("502")));
    }

    #[test]
    fn test_client_timeout_maps_to_upstream_timeout() {
        let err: ProviderError = ProviderClientError::Timeout("operation timed out".to_string()).into();
        assert_eq!(err.to_string(), "Upstream timed out: operation timed out");
    }

    fn reqwest_status(code: u16) -> streamsource_providers::error::StatusCode {
        streamsource_providers::error::StatusCode::from_u16(code).unwrap()
    }
}
