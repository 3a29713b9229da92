use thiserror::Error;

use crate::metadata::MetadataError;
use crate::resolver::{ResolutionFailure, ResolveError};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("{0}")]
    NoSources(ResolutionFailure),

    #[error("No providers configured")]
    NoProviders,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Metadata unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Caller asked for something that does not exist, as opposed to a server fault
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NoSources(_) | Self::NotFound(_))
    }
}

impl From<ResolveError> for Error {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NoProviders => Self::NoProviders,
            ResolveError::UnknownProvider(key) => Self::UnknownProvider(key),
            ResolveError::NoSources(failure) => Self::NoSources(failure),
        }
    }
}

impl From<MetadataError> for Error {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::NotFound(msg) => Self::NotFound(msg),
            MetadataError::InvalidId(msg) => Self::InvalidInput(msg),
            MetadataError::Unavailable(msg) => Self::MetadataUnavailable(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
