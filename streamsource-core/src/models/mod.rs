pub mod media;

pub use media::{
    CanonicalMedia, MatchCandidate, MediaType, ProviderEpisode, ProviderMediaInfo,
    ProviderSearchItem, ProviderSources, SourceBundle, StreamSource, Subtitle,
};
