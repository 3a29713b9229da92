// Canonical media metadata
//
// The resolver never looks titles up itself: a MetadataSource turns an external
// catalogue id into the CanonicalMedia every provider pipeline is scored against.

pub mod tmdb;

use async_trait::async_trait;
use streamsource_providers::ProviderClientError;

use crate::models::{CanonicalMedia, MediaType};

pub use tmdb::TmdbMetadata;

/// Metadata lookup errors
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("Media not found: {0}")]
    NotFound(String),

    #[error("Invalid media id: {0}")]
    InvalidId(String),

    #[error("Metadata service unavailable: {0}")]
    Unavailable(String),
}

impl From<ProviderClientError> for MetadataError {
    fn from(err: ProviderClientError) -> Self {
        match err {
            e if e.is_not_found() => Self::NotFound(e.to_string()),
            ProviderClientError::InvalidInput(msg) => Self::InvalidId(msg),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// Source of canonical media descriptors
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Look up `id` in the external catalogue. Not retried.
    async fn fetch_media(&self, id: &str, media_type: MediaType) -> Result<CanonicalMedia, MetadataError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamsource_providers::error::StatusCode;

    #[test]
    fn test_client_error_mapping() {
        let not_found: MetadataError = ProviderClientError::Http {
            status: StatusCode::NOT_FOUND,
            url: "https://api.themoviedb.org/3/movie/0".to_string(),
        }
        .into();
        assert!(matches!(not_found, MetadataError::NotFound(_)));

        let bad_id: MetadataError = ProviderClientError::InvalidInput("abc".to_string()).into();
        assert!(matches!(bad_id, MetadataError::InvalidId(_)));

        let down: MetadataError = ProviderClientError::Timeout("deadline".to_string()).into();
        assert!(matches!(down, MetadataError::Unavailable(_)));
    }
}
