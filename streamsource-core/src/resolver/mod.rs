// Resolution engine
//
// scoring      - pure match confidence for search items
// pipeline     - one provider: search → match → details → episode → sources
// attempt      - per-provider outcome records
// orchestrator - sequential failover or concurrent race over the registry

pub mod attempt;
pub mod orchestrator;
pub mod pipeline;
pub mod scoring;

pub use attempt::{Attempt, AttemptReport, ResolutionFailure};
pub use orchestrator::{OrchestrationMode, ResolveError, Resolver, ResolverSettings};
pub use pipeline::{
    NoMatchReason, PipelineSettings, ProviderPipeline, Resolution, Stage, StageFailure, StageTimeouts,
};
pub use scoring::{best_match, normalize_title, score};
