//! TMDB Client
//!
//! Canonical movie / TV metadata lookups by TMDB id.

mod client;
pub mod types;

pub use client::{TmdbClient, DEFAULT_TMDB_BASE_URL};
pub use types::*;
