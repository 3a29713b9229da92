//! Test helpers and fixtures for streamsource-core tests
//!
//! `ScriptedProvider` plays back a fixed script of replies with per-stage
//! delays and records every stage it enters and leaves in a shared
//! `CallLog`, so ordering and cancellation can be asserted under paused time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::models::{
    CanonicalMedia, ProviderMediaInfo, ProviderSearchItem, ProviderSources, StreamSource,
};
use crate::provider::{AdapterFactory, ProviderAdapter, ProviderError, ProviderRegistry};
use crate::resolver::Stage;

/// What a scripted call returns after its delay
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Value(T),
    Fail(String),
    NotFound,
    Panic,
}

#[derive(Debug, Clone)]
pub struct Step<T> {
    pub delay: Duration,
    pub reply: Reply<T>,
}

impl<T> Step<T> {
    fn value(value: T) -> Self {
        Self {
            delay: Duration::ZERO,
            reply: Reply::Value(value),
        }
    }
}

/// Replies for each of the three adapter calls
#[derive(Debug, Clone)]
pub struct Script {
    pub search: Step<Vec<ProviderSearchItem>>,
    pub details: Step<ProviderMediaInfo>,
    pub sources: Step<ProviderSources>,
}

impl Script {
    /// A movie the provider lists and can stream from `url`
    pub fn movie_hit(title: &str, year: i32, url: &str) -> Self {
        let id = format!("movie/{}", title.to_ascii_lowercase().replace(' ', "-"));
        Self {
            search: Step::value(vec![ProviderSearchItem {
                id: id.clone(),
                title: title.to_string(),
                item_type: Some("Movie".to_string()),
                year: Some(year.to_string()),
                seasons: None,
            }]),
            details: Step::value(ProviderMediaInfo {
                id,
                episodes: vec![],
            }),
            sources: Step::value(test_sources(url)),
        }
    }

    /// A provider whose catalogue has nothing
    pub fn empty() -> Self {
        Self {
            search: Step::value(vec![]),
            details: Step::value(ProviderMediaInfo::default()),
            sources: Step::value(ProviderSources::default()),
        }
    }

    pub fn delayed(mut self, stage: Stage, delay: Duration) -> Self {
        match stage {
            Stage::Search => self.search.delay = delay,
            Stage::Details => self.details.delay = delay,
            Stage::Sources => self.sources.delay = delay,
        }
        self
    }

    /// Same delay on every stage
    pub fn slow(self, delay: Duration) -> Self {
        self.delayed(Stage::Search, delay)
            .delayed(Stage::Details, delay)
            .delayed(Stage::Sources, delay)
    }

    pub fn failing(mut self, stage: Stage, message: &str) -> Self {
        let message = message.to_string();
        match stage {
            Stage::Search => self.search.reply = Reply::Fail(message),
            Stage::Details => self.details.reply = Reply::Fail(message),
            Stage::Sources => self.sources.reply = Reply::Fail(message),
        }
        self
    }

    pub fn not_found(mut self, stage: Stage) -> Self {
        match stage {
            Stage::Search => self.search.reply = Reply::NotFound,
            Stage::Details => self.details.reply = Reply::NotFound,
            Stage::Sources => self.sources.reply = Reply::NotFound,
        }
        self
    }

    pub fn panicking(mut self, stage: Stage) -> Self {
        match stage {
            Stage::Search => self.search.reply = Reply::Panic,
            Stage::Details => self.details.reply = Reply::Panic,
            Stage::Sources => self.sources.reply = Reply::Panic,
        }
        self
    }
}

/// Whether a stage was entered or left (completed or cancelled)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Enter,
    Leave,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub provider: String,
    pub stage: Stage,
    pub phase: Phase,
    pub at: Instant,
}

/// Chronological record of scripted calls, shared by every adapter a factory builds
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
    built: Arc<Mutex<HashMap<String, usize>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, provider: &str, stage: Stage, phase: Phase) {
        self.calls.lock().unwrap().push(Call {
            provider: provider.to_string(),
            stage,
            phase,
            at: Instant::now(),
        });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of network calls made, across all providers
    pub fn network_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.phase == Phase::Enter)
            .count()
    }

    /// Number of adapters built for `provider`
    pub fn built(&self, provider: &str) -> usize {
        self.built.lock().unwrap().get(provider).copied().unwrap_or(0)
    }

    pub fn total_built(&self) -> usize {
        self.built.lock().unwrap().values().sum()
    }

    /// First time `provider` entered `stage`
    pub fn entered(&self, provider: &str, stage: Stage) -> Option<Instant> {
        self.find(provider, stage, Phase::Enter)
    }

    /// Last time `provider` left any stage
    pub fn last_left(&self, provider: &str) -> Option<Instant> {
        self.calls()
            .iter()
            .rev()
            .find(|c| c.provider == provider && c.phase == Phase::Leave)
            .map(|c| c.at)
    }

    /// Index in the log of `provider` entering `stage`
    pub fn position(&self, provider: &str, stage: Stage, phase: Phase) -> Option<usize> {
        self.calls()
            .iter()
            .position(|c| c.provider == provider && c.stage == stage && c.phase == phase)
    }

    fn find(&self, provider: &str, stage: Stage, phase: Phase) -> Option<Instant> {
        self.calls()
            .iter()
            .find(|c| c.provider == provider && c.stage == stage && c.phase == phase)
            .map(|c| c.at)
    }
}

/// Records `Leave` when dropped, so cancelled calls are logged too
struct StageGuard<'a> {
    log: &'a CallLog,
    provider: &'a str,
    stage: Stage,
}

impl Drop for StageGuard<'_> {
    fn drop(&mut self) {
        self.log.push(self.provider, self.stage, Phase::Leave);
    }
}

/// In-memory adapter that plays back a `Script`
pub struct ScriptedProvider {
    key: String,
    script: Script,
    log: CallLog,
}

impl ScriptedProvider {
    pub fn new(key: &str, script: Script, log: CallLog) -> Self {
        Self {
            key: key.to_string(),
            script,
            log,
        }
    }

    /// Factory that counts builds in `log`
    pub fn factory(key: &str, script: Script, log: CallLog) -> AdapterFactory {
        let key = key.to_string();
        Box::new(move || {
            *log.built.lock().unwrap().entry(key.clone()).or_default() += 1;
            Ok(Box::new(Self::new(&key, script.clone(), log.clone())) as Box<dyn ProviderAdapter>)
        })
    }

    async fn play<T: Clone>(&self, stage: Stage, step: &Step<T>) -> Result<T, ProviderError> {
        self.log.push(&self.key, stage, Phase::Enter);
        let _guard = StageGuard {
            log: &self.log,
            provider: &self.key,
            stage,
        };
        tokio::time::sleep(step.delay).await;
        match &step.reply {
            Reply::Value(value) => Ok(value.clone()),
            Reply::Fail(message) => Err(ProviderError::NetworkError(message.clone())),
            Reply::NotFound => Err(ProviderError::NotFound),
            Reply::Panic => panic!("scripted panic in {stage}"),
        }
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedProvider {
    async fn search(&self, _title: &str) -> Result<Vec<ProviderSearchItem>, ProviderError> {
        self.play(Stage::Search, &self.script.search).await
    }

    async fn fetch_details(&self, _id: &str) -> Result<ProviderMediaInfo, ProviderError> {
        self.play(Stage::Details, &self.script.details).await
    }

    async fn fetch_sources(
        &self,
        _episode_id: &str,
        _media_id: &str,
    ) -> Result<ProviderSources, ProviderError> {
        self.play(Stage::Sources, &self.script.sources).await
    }
}

/// Registry with one scripted provider per `(key, script)`, registered in order
pub fn scripted_registry(providers: Vec<(&str, Script)>, log: &CallLog) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    for (key, script) in providers {
        registry.register_factory(key, ScriptedProvider::factory(key, script, log.clone()));
    }
    registry
}

pub fn test_sources(url: &str) -> ProviderSources {
    ProviderSources {
        sources: vec![StreamSource {
            url: url.to_string(),
            quality: Some("1080p".to_string()),
            is_playlist: url.ends_with(".m3u8"),
            headers: HashMap::new(),
        }],
        subtitles: vec![],
    }
}

pub fn inception() -> CanonicalMedia {
    CanonicalMedia::movie("Inception", Some(2010))
}
