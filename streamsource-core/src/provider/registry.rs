// Provider Registry
//
// Factory-based registry: every resolution request builds its own adapter instances

use super::{ProviderAdapter, ProviderError};
use indexmap::IndexMap;
use std::fmt;

/// Provider factory function type
pub type AdapterFactory =
    Box<dyn Fn() -> Result<Box<dyn ProviderAdapter>, ProviderError> + Send + Sync>;

/// Provider registry
///
/// Maps provider keys to factories. Registration order is preserved and is the
/// default priority order when no explicit priority is configured.
///
/// Adapters are never cached here: each call to `create` yields a fresh
/// instance owned by exactly one pipeline for the lifetime of one request.
pub struct ProviderRegistry {
    factories: IndexMap<String, AdapterFactory>,
}

impl ProviderRegistry {
    /// Create new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// Register a provider factory
    ///
    /// Re-registering a key replaces its factory but keeps its original position.
    ///
    /// # Example
    /// ```ignore
    /// registry.register_factory("flixhq", Box::new(move || {
    ///     Ok(Box::new(ConsumetProvider::new(client.clone())) as Box<dyn ProviderAdapter>)
    /// }));
    /// ```
    pub fn register_factory(&mut self, key: impl Into<String>, factory: AdapterFactory) {
        let key = key.into();
        tracing::debug!("Registered provider factory: {}", key);
        self.factories.insert(key, factory);
    }

    /// Build a fresh adapter for `key`. `None` if the key is not registered.
    pub fn create(&self, key: &str) -> Option<Result<Box<dyn ProviderAdapter>, ProviderError>> {
        self.factories.get(key).map(|factory| factory())
    }

    /// Check if a provider key is registered
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Registered keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
