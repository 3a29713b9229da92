//! Resolution orchestrator
//!
//! Runs provider pipelines either one at a time in priority order
//! (`Sequential`) or all at once (`Race`), returning the first bundle found.
//! Every pipeline runs in its own task so a panicking provider is recorded as
//! an attempt instead of tearing down the request.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn, Instrument};

use super::attempt::{Attempt, AttemptReport, ResolutionFailure};
use super::pipeline::{PipelineSettings, ProviderPipeline};
use crate::models::{CanonicalMedia, SourceBundle};
use crate::provider::{ProviderAdapter, ProviderRegistry};

/// How providers are driven
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrchestrationMode {
    /// Try providers one at a time until one succeeds
    #[default]
    Sequential,
    /// Query every provider at once, first success wins
    Race,
}

impl fmt::Display for OrchestrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => f.write_str("sequential"),
            Self::Race => f.write_str("race"),
        }
    }
}

/// Orchestrator errors
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no providers configured")]
    NoProviders,

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("{0}")]
    NoSources(ResolutionFailure),
}

/// Everything the orchestrator needs besides the registry
#[derive(Debug, Clone, Default)]
pub struct ResolverSettings {
    pub pipeline: PipelineSettings,
    pub mode: OrchestrationMode,
    /// Keys tried first, in order; remaining registered keys follow in registration order
    pub priority: Vec<String>,
    /// When set, only these keys may run
    pub allow_list: Option<Vec<String>>,
    /// Upper bound on simultaneously running pipelines in race mode (0 = unbounded)
    pub max_concurrency: usize,
}

impl ResolverSettings {
    fn allows(&self, key: &str) -> bool {
        self.allow_list
            .as_ref()
            .is_none_or(|allowed| allowed.iter().any(|k| k == key))
    }
}

/// Provider resolution engine
#[derive(Debug, Clone)]
pub struct Resolver {
    registry: Arc<ProviderRegistry>,
    settings: ResolverSettings,
}

impl Resolver {
    #[must_use]
    pub const fn new(registry: Arc<ProviderRegistry>, settings: ResolverSettings) -> Self {
        Self { registry, settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    #[must_use]
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Ordered provider keys for one request.
    ///
    /// Fails with `UnknownProvider` if `preferred` is not registered or not
    /// allowed, and with `NoProviders` if nothing is left to run. Builds no
    /// adapters and issues no network calls.
    pub fn provider_plan(&self, preferred: Option<&str>) -> Result<Vec<String>, ResolveError> {
        let mut plan: Vec<String> = Vec::with_capacity(self.registry.len());
        for key in &self.settings.priority {
            if !self.registry.contains(key) {
                warn!("Ignoring unregistered provider in priority list: {}", key);
                continue;
            }
            if !plan.contains(key) {
                plan.push(key.clone());
            }
        }
        for key in self.registry.keys() {
            if !plan.iter().any(|k| k == key) {
                plan.push(key.to_string());
            }
        }
        plan.retain(|key| self.settings.allows(key));

        if let Some(preferred) = preferred {
            if !self.registry.contains(preferred) || !self.settings.allows(preferred) {
                return Err(ResolveError::UnknownProvider(preferred.to_string()));
            }
            plan.retain(|key| key != preferred);
            plan.insert(0, preferred.to_string());
        }

        if plan.is_empty() {
            return Err(ResolveError::NoProviders);
        }
        Ok(plan)
    }

    /// Resolve `media` (optionally narrowed to `season`/`episode`) to one provider's sources
    pub async fn resolve(
        &self,
        media: CanonicalMedia,
        season: Option<u32>,
        episode: Option<u32>,
        preferred: Option<&str>,
    ) -> Result<SourceBundle, ResolveError> {
        let plan = self.provider_plan(preferred)?;
        let media = Arc::new(media.with_episode(season, episode));

        info!(
            title = %media.title,
            media_type = %media.media_type,
            mode = %self.settings.mode,
            providers = plan.len(),
            "Resolving sources"
        );

        let started = Instant::now();
        let result = match self.settings.mode {
            OrchestrationMode::Sequential => self.resolve_sequential(plan, media).await,
            OrchestrationMode::Race => self.resolve_race(plan, media).await,
        };

        match &result {
            Ok(bundle) => info!(
                provider = %bundle.provider_key,
                sources = bundle.sources.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Resolved sources"
            ),
            Err(ResolveError::NoSources(failure)) => info!(
                attempts = failure.attempts.len(),
                timeouts = failure.timeout_count(),
                errors = failure.error_count(),
                "No provider produced sources"
            ),
            Err(_) => {}
        }
        result
    }

    async fn resolve_sequential(
        &self,
        plan: Vec<String>,
        media: Arc<CanonicalMedia>,
    ) -> Result<SourceBundle, ResolveError> {
        let mut attempts = Vec::with_capacity(plan.len());

        for key in plan {
            let report = match self.build_adapter(&key) {
                Ok(adapter) => {
                    // A single-task set so dropping this future aborts the pipeline too.
                    let mut task = JoinSet::new();
                    task.spawn(run_provider(
                        key.clone(),
                        adapter,
                        media.clone(),
                        self.settings.pipeline,
                        None,
                    ));
                    match task.join_next().await {
                        Some(Ok((report, _))) => report,
                        Some(Err(join_err)) => crashed(key, &join_err),
                        None => crashed(key, &"task vanished"),
                    }
                }
                Err(report) => report,
            };

            if let Attempt::Success(bundle) = report.attempt {
                return Ok(bundle);
            }
            attempts.push(report);
        }

        Err(ResolveError::NoSources(ResolutionFailure {
            mode: OrchestrationMode::Sequential,
            attempts,
        }))
    }

    async fn resolve_race(
        &self,
        plan: Vec<String>,
        media: Arc<CanonicalMedia>,
    ) -> Result<SourceBundle, ResolveError> {
        let limit = (self.settings.max_concurrency > 0)
            .then(|| Arc::new(Semaphore::new(self.settings.max_concurrency)));
        let mut attempts = Vec::with_capacity(plan.len());
        let mut tasks = JoinSet::new();
        let mut task_keys = HashMap::with_capacity(plan.len());

        for key in plan {
            match self.build_adapter(&key) {
                Ok(adapter) => {
                    let handle = tasks.spawn(run_provider(
                        key.clone(),
                        adapter,
                        media.clone(),
                        self.settings.pipeline,
                        limit.clone(),
                    ));
                    task_keys.insert(handle.id(), key);
                }
                Err(report) => attempts.push(report),
            }
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            // The finished task's permit is released only after its report is
            // judged, so no queued provider starts once a winner exists.
            let (report, permit) = match joined {
                Ok((_, finished)) => finished,
                Err(join_err) => {
                    let key = task_keys
                        .remove(&join_err.id())
                        .unwrap_or_else(|| "unknown".to_string());
                    (crashed(key, &join_err), None)
                }
            };

            if let Attempt::Success(bundle) = report.attempt {
                debug!(
                    winner = %bundle.provider_key,
                    abandoned = tasks.len(),
                    "Race won, aborting remaining providers"
                );
                tasks.abort_all();
                drop(permit);
                return Ok(bundle);
            }
            drop(permit);
            attempts.push(report);
        }

        Err(ResolveError::NoSources(ResolutionFailure {
            mode: OrchestrationMode::Race,
            attempts,
        }))
    }

    /// Fresh adapter for this request, or the report explaining why there is none
    fn build_adapter(&self, key: &str) -> Result<Box<dyn ProviderAdapter>, AttemptReport> {
        match self.registry.create(key) {
            Some(Ok(adapter)) => Ok(adapter),
            Some(Err(err)) => {
                warn!(provider = key, "Failed to build provider adapter: {}", err);
                Err(AttemptReport {
                    provider: key.to_string(),
                    attempt: Attempt::Unavailable(err),
                    elapsed: Duration::ZERO,
                })
            }
            None => Err(AttemptReport {
                provider: key.to_string(),
                attempt: Attempt::Crashed("provider disappeared from registry".to_string()),
                elapsed: Duration::ZERO,
            }),
        }
    }
}

/// One provider's pipeline inside its own task and span.
///
/// Returns the concurrency permit still held; the caller decides when the
/// next queued provider may start.
async fn run_provider(
    key: String,
    adapter: Box<dyn ProviderAdapter>,
    media: Arc<CanonicalMedia>,
    settings: PipelineSettings,
    limit: Option<Arc<Semaphore>>,
) -> (AttemptReport, Option<OwnedSemaphorePermit>) {
    let span = tracing::info_span!("provider", provider = %key);
    async move {
        let permit = match limit {
            Some(semaphore) => semaphore.acquire_owned().await.ok(),
            None => None,
        };

        let started = Instant::now();
        let outcome = ProviderPipeline::new(&key, adapter.as_ref(), &settings)
            .run(&media)
            .await;
        let elapsed = started.elapsed();
        debug!(elapsed_ms = elapsed.as_millis() as u64, "Provider pipeline finished");

        let report = AttemptReport {
            provider: key,
            attempt: outcome.into(),
            elapsed,
        };
        (report, permit)
    }
    .instrument(span)
    .await
}

fn crashed(key: String, cause: &dyn fmt::Display) -> AttemptReport {
    warn!(provider = %key, "Provider task crashed: {}", cause);
    AttemptReport {
        provider: key,
        attempt: Attempt::Crashed(cause.to_string()),
        elapsed: Duration::ZERO,
    }
}
