//! Bootstrap module for initializing the `StreamSource` server
//!
//! This module handles:
//! - Configuration loading
//! - Provider registry construction
//! - Service initialization

pub mod config;
pub mod services;

pub use config::load_config;
pub use services::{build_registry, init_services, Services};
