//! Attempt records
//!
//! The outcome of one provider's pipeline run, kept only for diagnostics of
//! the request that produced it.

use std::fmt;
use std::time::Duration;

use super::pipeline::{NoMatchReason, Resolution, Stage, StageFailure};
use super::OrchestrationMode;
use crate::models::SourceBundle;
use crate::provider::ProviderError;

/// Outcome of one provider run
#[derive(Debug)]
pub enum Attempt {
    Success(SourceBundle),
    NoMatch(NoMatchReason),
    Timeout { stage: Stage, limit: Duration },
    Error { stage: Stage, source: ProviderError },
    /// The adapter could not be built for this request
    Unavailable(ProviderError),
    /// The provider task panicked or was cancelled
    Crashed(String),
}

impl Attempt {
    /// Timeouts, adapter errors, unavailable adapters and crashes; not clean no-matches
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        !matches!(self, Self::Success(_) | Self::NoMatch(_))
    }

    /// Short machine-readable label
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::NoMatch(_) => "no_match",
            Self::Timeout { .. } => "timeout",
            Self::Error { .. } => "error",
            Self::Unavailable(_) => "unavailable",
            Self::Crashed(_) => "crashed",
        }
    }

    /// Stage the attempt stopped at, if it was a stage failure
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Timeout { stage, .. } | Self::Error { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl From<Result<Resolution, StageFailure>> for Attempt {
    fn from(outcome: Result<Resolution, StageFailure>) -> Self {
        match outcome {
            Ok(Resolution::Found(bundle)) => Self::Success(bundle),
            Ok(Resolution::NoMatch(reason)) => Self::NoMatch(reason),
            Err(StageFailure::Timeout { stage, limit }) => Self::Timeout { stage, limit },
            Err(StageFailure::Error { stage, source }) => Self::Error { stage, source },
        }
    }
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(bundle) => write!(f, "{} sources", bundle.sources.len()),
            Self::NoMatch(reason) => write!(f, "no match: {reason}"),
            Self::Timeout { stage, limit } => write!(f, "{stage} timed out after {limit:?}"),
            Self::Error { stage, source } => write!(f, "{stage} failed: {source}"),
            Self::Unavailable(source) => write!(f, "adapter unavailable: {source}"),
            Self::Crashed(cause) => write!(f, "provider task crashed: {cause}"),
        }
    }
}

/// An attempt tagged with its provider
#[derive(Debug)]
pub struct AttemptReport {
    pub provider: String,
    pub attempt: Attempt,
    pub elapsed: Duration,
}

/// Every provider failed. Reports are in plan order (sequential) or completion order (race).
#[derive(Debug)]
pub struct ResolutionFailure {
    pub mode: OrchestrationMode,
    pub attempts: Vec<AttemptReport>,
}

impl ResolutionFailure {
    fn count(&self, kind: &str) -> usize {
        self.attempts.iter().filter(|r| r.attempt.kind() == kind).count()
    }

    #[must_use]
    pub fn no_match_count(&self) -> usize {
        self.count("no_match")
    }

    #[must_use]
    pub fn timeout_count(&self) -> usize {
        self.count("timeout")
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count("error")
    }

    /// Attempt for `provider`, if it ran
    #[must_use]
    pub fn attempt_for(&self, provider: &str) -> Option<&Attempt> {
        self.attempts
            .iter()
            .find(|r| r.provider == provider)
            .map(|r| &r.attempt)
    }
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no sources found ({} mode", self.mode)?;
        for report in &self.attempts {
            write!(f, "; {}: {}", report.provider, report.attempt)?;
        }
        f.write_str(")")
    }
}
