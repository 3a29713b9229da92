//! Single-provider pipeline
//!
//! Drives one adapter through search → best match → details → episode
//! resolution → sources. Each network stage runs under its own deadline.
//! A clean negative result is `Ok(Resolution::NoMatch(_))`; only timeouts and
//! adapter errors are `Err`.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::scoring::{self, DEFAULT_MIN_SCORE};
use crate::models::{CanonicalMedia, MediaType, ProviderMediaInfo, SourceBundle};
use crate::provider::{ProviderAdapter, ProviderError};

/// Network-bound pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Search,
    Details,
    Sources,
}

impl Stage {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Details => "details",
            Self::Sources => "sources",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-stage deadlines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTimeouts {
    pub search: Duration,
    pub details: Duration,
    pub sources: Duration,
}

impl StageTimeouts {
    #[must_use]
    pub const fn for_stage(&self, stage: Stage) -> Duration {
        match stage {
            Stage::Search => self.search,
            Stage::Details => self.details,
            Stage::Sources => self.sources,
        }
    }

    /// Worst case wall time of one pipeline
    #[must_use]
    pub fn total(&self) -> Duration {
        self.search + self.details + self.sources
    }
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self {
            search: Duration::from_secs(8),
            details: Duration::from_secs(8),
            sources: Duration::from_secs(12),
        }
    }
}

/// Settings shared by every pipeline of a resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub timeouts: StageTimeouts,
    pub min_score: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            timeouts: StageTimeouts::default(),
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

/// Why a provider cleanly found nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum NoMatchReason {
    /// Search returned no items
    EmptySearch,
    /// Every item had a blank title
    NoTitledItems,
    /// Best candidate scored under the acceptance threshold
    BelowThreshold { best_score: u32 },
    /// Detail response carried no id
    MissingDetailId,
    /// Requested season/episode not listed
    EpisodeNotFound,
    /// Source fetch returned no streams
    NoSources,
}

impl std::fmt::Display for NoMatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySearch => f.write_str("search returned no results"),
            Self::NoTitledItems => f.write_str("search results carried no titles"),
            Self::BelowThreshold { best_score } => {
                write!(f, "best candidate scored {best_score}, below threshold")
            }
            Self::MissingDetailId => f.write_str("details carried no id"),
            Self::EpisodeNotFound => f.write_str("episode not found"),
            Self::NoSources => f.write_str("no sources returned"),
        }
    }
}

/// Successful pipeline outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(SourceBundle),
    NoMatch(NoMatchReason),
}

/// A stage that did not complete
#[derive(Debug, thiserror::Error)]
pub enum StageFailure {
    #[error("{stage} timed out after {limit:?}")]
    Timeout { stage: Stage, limit: Duration },

    #[error("{stage} failed: {source}")]
    Error {
        stage: Stage,
        #[source]
        source: ProviderError,
    },
}

impl StageFailure {
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Timeout { stage, .. } | Self::Error { stage, .. } => *stage,
        }
    }
}

/// Run `fut` under the deadline configured for `stage`.
async fn bounded<T, F>(stage: Stage, limit: Duration, fut: F) -> Result<T, StageFailure>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err(StageFailure::Error { stage, source }),
        Err(_) => Err(StageFailure::Timeout { stage, limit }),
    }
}

/// Title sent to provider search: the normalized canonical title.
#[must_use]
pub fn search_title(media: &CanonicalMedia) -> String {
    scoring::normalize_title(&media.title)
}

/// The id to request sources for.
///
/// Movies use the first nested sub-item when the provider lists one, else the
/// detail id. Shows need an exact `(season, episode)` entry.
#[must_use]
pub fn source_fetch_id<'a>(details: &'a ProviderMediaInfo, media: &CanonicalMedia) -> Option<&'a str> {
    match media.media_type {
        MediaType::Movie => Some(
            details
                .episodes
                .first()
                .map_or(details.id.as_str(), |e| e.id.as_str()),
        ),
        MediaType::Show => {
            let (season, episode) = (media.season?, media.episode?);
            details
                .episodes
                .iter()
                .find(|e| e.season == Some(season) && e.number == Some(episode))
                .map(|e| e.id.as_str())
        }
    }
}

/// One provider's run for one request
pub struct ProviderPipeline<'a> {
    key: &'a str,
    adapter: &'a dyn ProviderAdapter,
    settings: &'a PipelineSettings,
}

impl<'a> ProviderPipeline<'a> {
    #[must_use]
    pub const fn new(key: &'a str, adapter: &'a dyn ProviderAdapter, settings: &'a PipelineSettings) -> Self {
        Self { key, adapter, settings }
    }

    fn limit(&self, stage: Stage) -> Duration {
        self.settings.timeouts.for_stage(stage)
    }

    fn no_match(&self, reason: NoMatchReason) -> Result<Resolution, StageFailure> {
        debug!(provider = self.key, %reason, "no match");
        Ok(Resolution::NoMatch(reason))
    }

    /// Run every stage. Never panics on adapter misbehaviour; every failure is typed.
    pub async fn run(&self, media: &CanonicalMedia) -> Result<Resolution, StageFailure> {
        let result = self.run_stages(media).await;
        if let Err(failure) = &result {
            warn!(provider = self.key, stage = %failure.stage(), "provider attempt failed: {failure}");
        }
        result
    }

    async fn run_stages(&self, media: &CanonicalMedia) -> Result<Resolution, StageFailure> {
        let query = search_title(media);
        let items = bounded(Stage::Search, self.limit(Stage::Search), self.adapter.search(&query)).await?;
        if items.is_empty() {
            return self.no_match(NoMatchReason::EmptySearch);
        }

        let Some(best) = scoring::best_match(&items, media) else {
            return self.no_match(NoMatchReason::NoTitledItems);
        };
        if best.score < self.settings.min_score {
            return self.no_match(NoMatchReason::BelowThreshold { best_score: best.score });
        }
        debug!(provider = self.key, id = %best.item.id, title = %best.item.title, score = best.score, "selected candidate");

        let details = bounded(
            Stage::Details,
            self.limit(Stage::Details),
            self.adapter.fetch_details(&best.item.id),
        )
        .await?;
        if details.id.is_empty() {
            return self.no_match(NoMatchReason::MissingDetailId);
        }

        let Some(episode_id) = source_fetch_id(&details, media) else {
            return self.no_match(NoMatchReason::EpisodeNotFound);
        };

        let fetched = bounded(
            Stage::Sources,
            self.limit(Stage::Sources),
            self.adapter.fetch_sources(episode_id, &details.id),
        )
        .await?;
        if fetched.sources.is_empty() {
            return self.no_match(NoMatchReason::NoSources);
        }

        Ok(Resolution::Found(SourceBundle {
            provider_key: self.key.to_string(),
            sources: fetched.sources,
            subtitles: fetched.subtitles,
        }))
    }
}
