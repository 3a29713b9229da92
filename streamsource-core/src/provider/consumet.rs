//! Consumet ProviderAdapter
//!
//! Adapter that calls `ConsumetClient` to implement the `ProviderAdapter` trait

use super::{ProviderAdapter, ProviderError};
use crate::models::{
    ProviderEpisode, ProviderMediaInfo, ProviderSearchItem, ProviderSources, StreamSource, Subtitle,
};
use async_trait::async_trait;
use streamsource_providers::consumet::{InfoResp, SearchResp, WatchResp};
use streamsource_providers::ConsumetClient;

/// Consumet-backed provider (flixhq, goku, sflix, ...)
#[derive(Debug, Clone)]
pub struct ConsumetProvider {
    client: ConsumetClient,
}

impl ConsumetProvider {
    #[must_use]
    pub const fn new(client: ConsumetClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProviderAdapter for ConsumetProvider {
    async fn search(&self, title: &str) -> Result<Vec<ProviderSearchItem>, ProviderError> {
        let resp = self.client.search(title).await?;
        Ok(search_items(resp))
    }

    async fn fetch_details(&self, id: &str) -> Result<ProviderMediaInfo, ProviderError> {
        let resp = self.client.info(id).await?;
        Ok(media_info(resp))
    }

    async fn fetch_sources(
        &self,
        episode_id: &str,
        media_id: &str,
    ) -> Result<ProviderSources, ProviderError> {
        let resp = self.client.watch(episode_id, media_id).await?;
        Ok(provider_sources(resp))
    }
}

fn search_items(resp: SearchResp) -> Vec<ProviderSearchItem> {
    resp.results
        .into_iter()
        .map(|r| ProviderSearchItem {
            id: r.id,
            title: r.title,
            item_type: r.media_type,
            year: r.release_date,
            seasons: r.seasons,
        })
        .collect()
}

fn media_info(resp: InfoResp) -> ProviderMediaInfo {
    ProviderMediaInfo {
        id: resp.id,
        episodes: resp
            .episodes
            .into_iter()
            .map(|e| ProviderEpisode {
                id: e.id,
                season: e.season,
                number: e.number,
            })
            .collect(),
    }
}

/// Response-level headers (Referer) apply to every source.
fn provider_sources(resp: WatchResp) -> ProviderSources {
    let headers = resp.headers;
    ProviderSources {
        sources: resp
            .sources
            .into_iter()
            .map(|s| StreamSource {
                url: s.url,
                quality: s.quality,
                is_playlist: s.is_m3u8,
                headers: headers.clone(),
            })
            .collect(),
        subtitles: resp
            .subtitles
            .into_iter()
            .map(|s| Subtitle {
                url: s.url,
                lang: s.lang,
            })
            .collect(),
    }
}
