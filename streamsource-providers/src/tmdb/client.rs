//! TMDB HTTP Client

use std::time::Duration;

use reqwest::Client;
use url::Url;

use super::types::{MovieDetails, TvDetails};
use crate::error::{check_response, join_url, json_with_limit, parse_base_url, ProviderClientError};

/// Default TMDB v3 API root
pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// TMDB HTTP Client
///
/// Read-only lookups of movie and TV details by TMDB id, authenticated with a v3 API key.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    base_url: Url,
    api_key: String,
    client: Client,
}

impl TmdbClient {
    /// Create a new TMDB client
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderClientError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ProviderClientError::InvalidConfig("TMDB API key is empty".to_string()));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderClientError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self {
            base_url: parse_base_url(base_url)?,
            api_key,
            client,
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ProviderClientError> {
        let url = join_url(&self.base_url, path)?;
        let response = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;
        let response = check_response(response)?;
        json_with_limit(response).await
    }

    /// Fetch movie details
    pub async fn movie(&self, id: &str) -> Result<MovieDetails, ProviderClientError> {
        tracing::debug!(id, "tmdb movie lookup");
        self.get(&format!("movie/{}", encode_id(id)?)).await
    }

    /// Fetch TV show details
    pub async fn tv(&self, id: &str) -> Result<TvDetails, ProviderClientError> {
        tracing::debug!(id, "tmdb tv lookup");
        self.get(&format!("tv/{}", encode_id(id)?)).await
    }
}

/// TMDB ids are numeric; reject anything else before it reaches the URL.
fn encode_id(id: &str) -> Result<&str, ProviderClientError> {
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        Ok(id)
    } else {
        Err(ProviderClientError::InvalidInput(format!("invalid TMDB id: {id:?}")))
    }
}
