//! TMDB-backed metadata source

use async_trait::async_trait;
use streamsource_providers::tmdb::year_of;
use streamsource_providers::TmdbClient;

use super::{MetadataError, MetadataSource};
use crate::models::{CanonicalMedia, MediaType};

/// Canonical media from TMDB movie and TV details
#[derive(Debug, Clone)]
pub struct TmdbMetadata {
    client: TmdbClient,
}

impl TmdbMetadata {
    #[must_use]
    pub const fn new(client: TmdbClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetadataSource for TmdbMetadata {
    async fn fetch_media(&self, id: &str, media_type: MediaType) -> Result<CanonicalMedia, MetadataError> {
        let media = match media_type {
            MediaType::Movie => {
                let movie = self.client.movie(id).await?;
                CanonicalMedia::movie(movie.title, year_of(movie.release_date.as_deref()))
            }
            MediaType::Show => {
                let tv = self.client.tv(id).await?;
                CanonicalMedia::show(
                    tv.name,
                    year_of(tv.first_air_date.as_deref()),
                    tv.number_of_seasons,
                )
            }
        };
        tracing::debug!(id, title = %media.title, year = ?media.release_year, "Fetched canonical media");
        Ok(media)
    }
}
