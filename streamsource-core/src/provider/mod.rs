// Content Provider System
//
// Two-tier architecture:
//
// Tier 1: streamsource-providers (Pure provider HTTP clients)
//   - consumet::ConsumetClient
//   - Independent library with no ProviderAdapter dependency
//
// Tier 2: streamsource-core/provider (ProviderAdapter adapters)
//   - ConsumetProvider
//   - ProviderRegistry: key → factory, one fresh adapter per request

// Core traits and types
pub mod error;
pub mod registry;
pub mod traits;

// ProviderAdapter implementations
pub mod consumet;

pub use error::*;
pub use registry::*;
pub use traits::*;

pub use consumet::ConsumetProvider;
