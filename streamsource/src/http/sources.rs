//! Source lookup endpoint
//!
//! `GET /sources?id=<tmdb id>&s=<season>&e=<episode>&type=<movie|tv>&provider=<key>`

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use streamsource_core::{
    models::{MediaType, SourceBundle, StreamSource, Subtitle},
    service::SourceRequest,
};

use super::{AppError, AppResult, AppState};

/// Raw query string; numbers are parsed by hand so bad input gets a JSON 400
#[derive(Debug, Default, Deserialize)]
pub struct SourcesQuery {
    pub id: Option<String>,
    pub s: Option<String>,
    pub e: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub provider: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SourcesData {
    pub provider: String,
    pub sources: Vec<StreamSource>,
    pub subtitles: Vec<Subtitle>,
}

impl From<SourceBundle> for SourcesData {
    fn from(bundle: SourceBundle) -> Self {
        Self {
            provider: bundle.provider_key,
            sources: bundle.sources,
            subtitles: bundle.subtitles,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub data: SourcesData,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number(name: &str, value: Option<String>) -> AppResult<Option<u32>> {
    non_empty(value)
        .map(|v| {
            v.parse::<u32>()
                .map_err(|_| AppError::bad_request(format!("{name} must be a non-negative integer")))
        })
        .transpose()
}

impl TryFrom<SourcesQuery> for SourceRequest {
    type Error = AppError;

    fn try_from(query: SourcesQuery) -> AppResult<Self> {
        let media_id = non_empty(query.id).ok_or_else(|| AppError::bad_request("id is required"))?;
        let media_type = non_empty(query.media_type)
            .map(|t| t.parse::<MediaType>().map_err(AppError::bad_request))
            .transpose()?;

        Ok(Self {
            media_id,
            media_type,
            season: parse_number("s", query.s)?,
            episode: parse_number("e", query.e)?,
            provider: non_empty(query.provider),
        })
    }
}

/// Resolve sources for a TMDB id
pub async fn get_sources(
    State(state): State<AppState>,
    Query(query): Query<SourcesQuery>,
) -> AppResult<Json<SourcesResponse>> {
    let request = SourceRequest::try_from(query)?;
    let bundle = state.stream_service.resolve(&request).await?;
    Ok(Json(SourcesResponse { data: bundle.into() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> SourcesQuery {
        let mut query = SourcesQuery::default();
        for (key, value) in pairs {
            let value = Some((*value).to_string());
            match *key {
                "id" => query.id = value,
                "s" => query.s = value,
                "e" => query.e = value,
                "type" => query.media_type = value,
                "provider" => query.provider = value,
                other => panic!("unexpected key {other}"),
            }
        }
        query
    }

    #[test]
    fn test_query_to_request() {
        let request = SourceRequest::try_from(query(&[("id", "4607"), ("s", "2"), ("e", "5"), ("type", "tv")])).unwrap();
        assert_eq!(request.media_id, "4607");
        assert_eq!(request.media_type, Some(MediaType::Show));
        assert_eq!((request.season, request.episode), (Some(2), Some(5)));
        assert_eq!(request.provider, None);
    }

    #[test]
    fn test_blank_values_are_absent() {
        let request = SourceRequest::try_from(query(&[("id", "27205"), ("s", ""), ("provider", " ")])).unwrap();
        assert_eq!(request.season, None);
        assert_eq!(request.provider, None);
    }

    #[test]
    fn test_invalid_query_is_bad_request() {
        for pairs in [
            vec![],
            vec![("id", "  ")],
            vec![("id", "1"), ("s", "two")],
            vec![("id", "1"), ("e", "-1")],
            vec![("id", "1"), ("type", "podcast")],
        ] {
            let err = SourceRequest::try_from(query(&pairs)).unwrap_err();
            assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        }
    }
}
