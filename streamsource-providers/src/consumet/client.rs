//! Consumet HTTP Client
//!
//! Pure HTTP client for consumet-style movie provider APIs, no dependency on the resolver

use std::time::Duration;

use reqwest::{header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT}, Client};
use url::Url;

use super::types::{InfoResp, SearchResp, WatchResp};
use crate::error::{check_response, join_url, json_with_limit, parse_base_url, ProviderClientError};

/// Consumet HTTP Client
///
/// One client talks to one provider route (`flixhq`, `goku`, `sflix`, ...) of a
/// consumet deployment:
/// - `search` → `GET /movies/{route}/{query}`
/// - `info` → `GET /movies/{route}/info?id=`
/// - `watch` → `GET /movies/{route}/watch?episodeId=&mediaId=`
#[derive(Debug, Clone)]
pub struct ConsumetClient {
    base_url: Url,
    route: String,
    client: Client,
}

impl ConsumetClient {
    /// Create a new client for `route` under `base_url`
    pub fn new(
        base_url: &str,
        route: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderClientError> {
        let route = route.into();
        if route.is_empty() || route.contains('/') {
            return Err(ProviderClientError::InvalidConfig(format!(
                "invalid consumet route: {route:?}"
            )));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .default_headers(default_headers())
            .build()
            .map_err(|e| ProviderClientError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self {
            base_url: parse_base_url(base_url)?,
            route,
            client,
        })
    }

    /// Get the provider route this client targets
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    fn endpoint(&self, tail: &str) -> Result<Url, ProviderClientError> {
        join_url(&self.base_url, &format!("movies/{}/{tail}", self.route))
    }

    /// Search the provider catalogue by title
    pub async fn search(&self, query: &str) -> Result<SearchResp, ProviderClientError> {
        let mut url = self.endpoint("")?;
        url.path_segments_mut()
            .map_err(|()| ProviderClientError::InvalidConfig(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .push(query);

        tracing::debug!(route = %self.route, %url, "consumet search");
        let response = self.client.get(url).send().await?;
        let response = check_response(response)?;
        json_with_limit(response).await
    }

    /// Fetch media details (episode list) for a provider media id
    pub async fn info(&self, id: &str) -> Result<InfoResp, ProviderClientError> {
        let url = self.endpoint("info")?;

        tracing::debug!(route = %self.route, id, "consumet info");
        let response = self.client.get(url).query(&[("id", id)]).send().await?;
        let response = check_response(response)?;
        json_with_limit(response).await
    }

    /// Fetch playable sources for an episode (or a movie's single episode)
    pub async fn watch(&self, episode_id: &str, media_id: &str) -> Result<WatchResp, ProviderClientError> {
        let url = self.endpoint("watch")?;

        tracing::debug!(route = %self.route, episode_id, media_id, "consumet watch");
        let response = self
            .client
            .get(url)
            .query(&[("episodeId", episode_id), ("mediaId", media_id)])
            .send()
            .await?;
        let response = check_response(response)?;
        json_with_limit(response).await
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static("streamsource/0.1"));
    headers
}
