//! Consumet Provider Client
//!
//! Pure HTTP client for consumet-style movie provider APIs, independent of the resolver.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use streamsource_providers::consumet::ConsumetClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ConsumetClient::new("https://consumet.example.com", "flixhq", Duration::from_secs(10))?;
//! let found = client.search("Inception").await?;
//! let info = client.info(&found.results[0].id).await?;
//! # Ok(())
//! # }
//! ```

mod client;
pub mod types;

pub use client::ConsumetClient;
pub use types::*;
