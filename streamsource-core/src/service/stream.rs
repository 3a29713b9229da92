//! Stream source service
//!
//! Turns an external media id into a source bundle: canonical metadata first,
//! then provider resolution.

use std::sync::Arc;

use serde::Deserialize;

use crate::{
    metadata::MetadataSource,
    models::{MediaType, SourceBundle},
    resolver::Resolver,
    Error, Result,
};

/// One source lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourceRequest {
    /// External catalogue id (TMDB)
    pub media_id: String,
    pub media_type: Option<MediaType>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    /// Provider key to try first
    pub provider: Option<String>,
}

impl SourceRequest {
    /// Explicit type, else `Show` when both season and episode are given, else `Movie`
    #[must_use]
    pub fn resolved_media_type(&self) -> MediaType {
        self.media_type.unwrap_or(match (self.season, self.episode) {
            (Some(_), Some(_)) => MediaType::Show,
            _ => MediaType::Movie,
        })
    }
}

/// Source resolution service
#[derive(Clone)]
pub struct StreamService {
    metadata: Arc<dyn MetadataSource>,
    resolver: Resolver,
}

impl std::fmt::Debug for StreamService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamService")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl StreamService {
    /// Create a new stream service
    pub fn new(metadata: Arc<dyn MetadataSource>, resolver: Resolver) -> Self {
        Self { metadata, resolver }
    }

    #[must_use]
    pub const fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Resolve a request to one provider's sources
    pub async fn resolve(&self, request: &SourceRequest) -> Result<SourceBundle> {
        let media_id = request.media_id.trim();
        if media_id.is_empty() {
            return Err(Error::InvalidInput("media id is required".to_string()));
        }
        let media_type = request.resolved_media_type();
        if media_type == MediaType::Show && (request.season.is_none() || request.episode.is_none()) {
            return Err(Error::InvalidInput(
                "season and episode are required for shows".to_string(),
            ));
        }

        // Reject unknown providers before spending a metadata lookup
        self.resolver.provider_plan(request.provider.as_deref())?;

        let media = self.metadata.fetch_media(media_id, media_type).await?;
        let bundle = self
            .resolver
            .resolve(media, request.season, request.episode, request.provider.as_deref())
            .await?;
        Ok(bundle)
    }
}
