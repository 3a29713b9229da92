use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Movie or show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Show,
}

impl MediaType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Show => "show",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "show" | "tv" | "series" => Ok(Self::Show),
            other => Err(format!("unknown media type: {other}")),
        }
    }
}

/// Provider-agnostic description of the movie or episode being resolved.
///
/// Built once per request by the metadata collaborator and shared read-only
/// with every provider pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMedia {
    pub title: String,
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_seasons: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl CanonicalMedia {
    #[must_use]
    pub fn movie(title: impl Into<String>, release_year: Option<i32>) -> Self {
        Self {
            title: title.into(),
            media_type: MediaType::Movie,
            release_year,
            total_seasons: None,
            season: None,
            episode: None,
        }
    }

    #[must_use]
    pub fn show(title: impl Into<String>, release_year: Option<i32>, total_seasons: Option<u32>) -> Self {
        Self {
            title: title.into(),
            media_type: MediaType::Show,
            release_year,
            total_seasons,
            season: None,
            episode: None,
        }
    }

    /// Target a specific episode. `None` keeps the current value.
    #[must_use]
    pub fn with_episode(mut self, season: Option<u32>, episode: Option<u32>) -> Self {
        if season.is_some() {
            self.season = season;
        }
        if episode.is_some() {
            self.episode = episode;
        }
        self
    }

    #[must_use]
    pub const fn is_show(&self) -> bool {
        matches!(self.media_type, MediaType::Show)
    }
}

/// One entry of a provider's search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSearchItem {
    pub id: String,
    pub title: String,
    /// Free-form provider label ("Movie", "TV Series", ...)
    #[serde(default)]
    pub item_type: Option<String>,
    /// Free-form year or date string
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub seasons: Option<u32>,
}

/// A scored search item
#[derive(Debug, Clone, Copy)]
pub struct MatchCandidate<'a> {
    pub item: &'a ProviderSearchItem,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEpisode {
    pub id: String,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub number: Option<u32>,
}

/// Provider detail page: the media id plus its playable sub-items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMediaInfo {
    pub id: String,
    #[serde(default)]
    pub episodes: Vec<ProviderEpisode>,
}

/// A playable stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSource {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    /// HLS / DASH manifest rather than a progressive file
    #[serde(default)]
    pub is_playlist: bool,
    /// HTTP headers required for playback
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtitle {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// What a provider's source fetch returns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSources {
    #[serde(default)]
    pub sources: Vec<StreamSource>,
    #[serde(default)]
    pub subtitles: Vec<Subtitle>,
}

/// Terminal artifact of a successful resolution. Never merged across providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBundle {
    pub provider_key: String,
    pub sources: Vec<StreamSource>,
    #[serde(default)]
    pub subtitles: Vec<Subtitle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_str() {
        assert_eq!("movie".parse::<MediaType>(), Ok(MediaType::Movie));
        assert_eq!("TV".parse::<MediaType>(), Ok(MediaType::Show));
        assert_eq!(" show ".parse::<MediaType>(), Ok(MediaType::Show));
        assert!("podcast".parse::<MediaType>().is_err());
    }

    #[test]
    fn test_with_episode_keeps_existing_values() {
        let media = CanonicalMedia::show("Lost", Some(2004), Some(6)).with_episode(Some(2), Some(5));
        let media = media.with_episode(None, Some(6));
        assert_eq!(media.season, Some(2));
        assert_eq!(media.episode, Some(6));
        assert!(media.is_show());
    }

    #[test]
    fn test_canonical_media_serialization_skips_empty_fields() {
        let media = CanonicalMedia::movie("Inception", Some(2010));
        let value = serde_json::to_value(&media).unwrap();
        assert_eq!(value["media_type"], "movie");
        assert!(value.get("season").is_none());
    }
}
