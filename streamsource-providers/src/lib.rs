// StreamSource Provider Clients
//
// Pure HTTP client implementations for the upstream services the resolver talks to.
// These clients know nothing about scoring or orchestration and can be used standalone.
//
// Architecture:
// - streamsource-providers: Pure HTTP clients (consumet-style provider API, TMDB)
// - streamsource-core/provider: ProviderAdapter implementations calling these clients
// - streamsource-core/resolver: pipeline + orchestrator driving the adapters

// Shared error types
pub mod error;

// HTTP clients
pub mod consumet;
pub mod tmdb;

// Re-export client types for convenience
pub use consumet::ConsumetClient;
pub use error::ProviderClientError;
pub use tmdb::TmdbClient;
