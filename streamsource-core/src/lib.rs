pub mod models;
pub mod provider;
pub mod resolver;
pub mod metadata;
pub mod service;
pub mod config;
pub mod error;
pub mod logging;
pub mod bootstrap;

#[cfg(test)]
pub mod test_helpers;

pub use config::Config;
pub use error::{Error, Result};
