// Provider Adapter Trait
//
// The only surface the resolver sees of a content provider

use super::ProviderError;
use crate::models::{ProviderMediaInfo, ProviderSearchItem, ProviderSources};
use async_trait::async_trait;

/// Provider adapter
///
/// Uniform three-operation capability every content provider exposes.
/// The resolver depends only on this trait, never on a concrete provider,
/// so new providers are added by registering a factory.
///
/// Each call is a network round trip and is individually time-bounded by the
/// pipeline; implementations should not add their own retries.
///
/// # Flow
/// 1. `search(title)` → candidate items, scored by the resolver
/// 2. `fetch_details(best.id)` → episode list
/// 3. `fetch_sources(episode_id, media_id)` → playable streams
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Search the provider catalogue. An empty list is a clean negative result.
    async fn search(&self, title: &str) -> Result<Vec<ProviderSearchItem>, ProviderError>;

    /// Fetch details for a search item id
    async fn fetch_details(&self, id: &str) -> Result<ProviderMediaInfo, ProviderError>;

    /// Fetch playable sources for an episode (or a movie's single sub-item)
    async fn fetch_sources(
        &self,
        episode_id: &str,
        media_id: &str,
    ) -> Result<ProviderSources, ProviderError>;
}
