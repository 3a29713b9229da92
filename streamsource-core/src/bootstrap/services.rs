//! Service initialization and dependency injection

use std::sync::Arc;
use std::time::Duration;

use streamsource_providers::{ConsumetClient, TmdbClient};
use tracing::{info, warn};

use crate::{
    metadata::TmdbMetadata,
    provider::{AdapterFactory, ConsumetProvider, ProviderAdapter, ProviderError, ProviderRegistry},
    resolver::Resolver,
    service::StreamService,
    Config,
};

/// Container for all initialized services
#[derive(Clone, Debug)]
pub struct Services {
    /// Metadata lookup + provider resolution
    pub stream_service: Arc<StreamService>,
}

/// Registry with one consumet adapter factory per configured route, in config order
///
/// A route whose client cannot be built still gets registered; its factory
/// fails on every request so the failure shows up in attempt diagnostics.
#[must_use]
pub fn build_registry(config: &Config) -> ProviderRegistry {
    let providers = &config.providers;
    let timeout = Duration::from_millis(providers.request_timeout_ms);
    let mut registry = ProviderRegistry::new();

    for entry in &providers.consumet {
        let factory: AdapterFactory =
            match ConsumetClient::new(&providers.consumet_base_url, entry.route.as_str(), timeout) {
                Ok(client) => Box::new(move || {
                    Ok(Box::new(ConsumetProvider::new(client.clone())) as Box<dyn ProviderAdapter>)
                }),
                Err(e) => {
                    warn!(provider = %entry.key, "Provider client misconfigured: {}", e);
                    let message = e.to_string();
                    Box::new(move || Err(ProviderError::InvalidConfig(message.clone())))
                }
            };
        registry.register_factory(entry.key.clone(), factory);
    }

    info!(
        "Registered {} providers: {}",
        registry.len(),
        registry.keys().collect::<Vec<_>>().join(", ")
    );
    registry
}

/// Initialize all core services
pub fn init_services(config: &Config) -> Result<Services, anyhow::Error> {
    info!("Initializing services...");

    let tmdb = TmdbClient::new(
        &config.metadata.tmdb_base_url,
        config.metadata.tmdb_api_key.clone(),
        Duration::from_millis(config.metadata.request_timeout_ms),
    )?;
    let metadata = Arc::new(TmdbMetadata::new(tmdb));

    let resolver = Resolver::new(Arc::new(build_registry(config)), config.resolver.settings());
    info!(
        mode = %config.resolver.mode,
        min_score = config.resolver.min_score,
        "Resolver initialized"
    );

    Ok(Services {
        stream_service: Arc::new(StreamService::new(metadata, resolver)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsumetProviderConfig;

    #[test]
    fn test_registry_follows_config_order() {
        let mut config = Config::default();
        config.providers.consumet = vec![
            ConsumetProviderConfig {
                key: "goku".to_string(),
                route: "goku".to_string(),
            },
            ConsumetProviderConfig {
                key: "flix".to_string(),
                route: "flixhq".to_string(),
            },
        ];

        let registry = build_registry(&config);
        assert_eq!(registry.keys().collect::<Vec<_>>(), ["goku", "flix"]);
        assert!(registry.create("flix").unwrap().is_ok());
    }

    #[test]
    fn test_bad_route_registers_failing_factory() {
        let mut config = Config::default();
        config.providers.consumet = vec![ConsumetProviderConfig {
            key: "broken".to_string(),
            route: "movies/broken".to_string(),
        }];

        let registry = build_registry(&config);
        assert!(registry.contains("broken"));
        assert!(matches!(
            registry.create("broken"),
            Some(Err(ProviderError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_init_services_needs_tmdb_key() {
        assert!(init_services(&Config::default()).is_err());

        let mut config = Config::default();
        config.metadata.tmdb_api_key = "key".to_string();
        let services = init_services(&config).unwrap();
        assert_eq!(services.stream_service.resolver().registry().len(), 2);
    }
}
