use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::resolver::scoring::MAX_SCORE;
use crate::resolver::{OrchestrationMode, PipelineSettings, ResolverSettings, StageTimeouts};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub resolver: ResolverConfig,
    pub providers: ProvidersConfig,
    pub metadata: MetadataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub http_port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            http_port: 3000,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub mode: OrchestrationMode,
    pub min_score: u32,
    pub search_timeout_ms: u64,
    pub details_timeout_ms: u64,
    pub sources_timeout_ms: u64,
    /// Provider keys tried first, in order
    pub priority: Vec<String>,
    /// When set, only these provider keys run
    pub allow_list: Option<Vec<String>>,
    /// Race mode only; 0 = unbounded
    pub max_concurrency: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let pipeline = PipelineSettings::default();
        Self {
            mode: OrchestrationMode::Sequential,
            min_score: pipeline.min_score,
            search_timeout_ms: pipeline.timeouts.search.as_millis() as u64,
            details_timeout_ms: pipeline.timeouts.details.as_millis() as u64,
            sources_timeout_ms: pipeline.timeouts.sources.as_millis() as u64,
            priority: Vec::new(),
            allow_list: None,
            max_concurrency: 0,
        }
    }
}

impl ResolverConfig {
    /// Settings for the resolution engine
    #[must_use]
    pub fn settings(&self) -> ResolverSettings {
        ResolverSettings {
            pipeline: PipelineSettings {
                timeouts: StageTimeouts {
                    search: Duration::from_millis(self.search_timeout_ms),
                    details: Duration::from_millis(self.details_timeout_ms),
                    sources: Duration::from_millis(self.sources_timeout_ms),
                },
                min_score: self.min_score,
            },
            mode: self.mode,
            priority: self.priority.clone(),
            allow_list: self.allow_list.clone(),
            max_concurrency: self.max_concurrency,
        }
    }
}

/// One consumet-style provider route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumetProviderConfig {
    /// Registry key
    pub key: String,
    /// Path segment under `movies/` on the consumet API
    pub route: String,
}

impl ConsumetProviderConfig {
    fn new(name: &str) -> Self {
        Self {
            key: name.to_string(),
            route: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub consumet_base_url: String,
    /// Registered in this order
    pub consumet: Vec<ConsumetProviderConfig>,
    pub request_timeout_ms: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            consumet_base_url: "http://localhost:3001".to_string(),
            consumet: vec![
                ConsumetProviderConfig::new("flixhq"),
                ConsumetProviderConfig::new("goku"),
            ],
            request_timeout_ms: 15_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: String::new(),
            tmdb_base_url: streamsource_providers::tmdb::DEFAULT_TMDB_BASE_URL.to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Load config file if provided
        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // Override with environment variables (STREAMSOURCE_RESOLVER__MIN_SCORE, etc.)
        builder = builder.add_source(
            Environment::with_prefix("STREAMSOURCE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_origins")
                .with_list_parse_key("resolver.priority")
                .with_list_parse_key("resolver.allow_list")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only (for Docker/K8s)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Get HTTP address
    #[must_use]
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.http_port)
    }

    /// Check for misconfigurations, reporting all of them at once
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.http_port == 0 {
            errors.push("server.http_port must be non-zero".to_string());
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            errors.push(format!(
                "logging.format must be \"json\" or \"pretty\", got {:?}",
                self.logging.format
            ));
        }

        let resolver = &self.resolver;
        for (name, value) in [
            ("search_timeout_ms", resolver.search_timeout_ms),
            ("details_timeout_ms", resolver.details_timeout_ms),
            ("sources_timeout_ms", resolver.sources_timeout_ms),
        ] {
            if value == 0 {
                errors.push(format!("resolver.{name} must be non-zero"));
            }
        }
        if resolver.min_score > MAX_SCORE {
            errors.push(format!(
                "resolver.min_score must be at most {MAX_SCORE}, got {}",
                resolver.min_score
            ));
        }

        if self.providers.consumet.is_empty() {
            errors.push("providers.consumet must list at least one provider".to_string());
        }
        if url::Url::parse(&self.providers.consumet_base_url).is_err() {
            errors.push(format!(
                "providers.consumet_base_url is not a valid URL: {}",
                self.providers.consumet_base_url
            ));
        }

        let mut seen = HashSet::new();
        for provider in &self.providers.consumet {
            if provider.key.trim().is_empty() {
                errors.push("providers.consumet entries need a non-empty key".to_string());
            } else if !seen.insert(provider.key.as_str()) {
                errors.push(format!("providers.consumet has duplicate key {:?}", provider.key));
            }
            if provider.route.trim().is_empty() || provider.route.contains('/') {
                errors.push(format!(
                    "providers.consumet route for {:?} must be a single path segment",
                    provider.key
                ));
            }
        }

        if let Some(allowed) = &resolver.allow_list {
            if !allowed.iter().any(|key| seen.contains(key.as_str())) {
                errors.push("resolver.allow_list excludes every configured provider".to_string());
            }
        }

        if self.metadata.tmdb_api_key.is_empty() {
            errors.push("metadata.tmdb_api_key is required".to_string());
        }
        if url::Url::parse(&self.metadata.tmdb_base_url).is_err() {
            errors.push(format!(
                "metadata.tmdb_base_url is not a valid URL: {}",
                self.metadata.tmdb_base_url
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
