//! Consumet API wire types
//!
//! Field names follow the upstream JSON (camelCase). Only the fields the
//! resolver needs are modelled; everything else is ignored.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// `GET /movies/{route}/{query}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResp {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Usually `"2010"`, sometimes a full date or a bare number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub release_date: Option<String>,
    /// `"Movie"` or `"TV Series"` on flixhq-like sites.
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub seasons: Option<u32>,
}

/// `GET /movies/{route}/info?id=...`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResp {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub episodes: Vec<EpisodeInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeInfo {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
}

/// `GET /movies/{route}/watch?episodeId=...&mediaId=...`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchResp {
    /// Headers the player must send, typically `Referer`.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub sources: Vec<VideoSource>,
    #[serde(default)]
    pub subtitles: Vec<SubtitleSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSource {
    pub url: String,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default, rename = "isM3U8")]
    pub is_m3u8: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleSource {
    pub url: String,
    #[serde(default)]
    pub lang: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
