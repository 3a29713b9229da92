//! Match scoring
//!
//! Confidence that a provider search item is the canonical media. Weights are
//! fixed so results are reproducible:
//!
//! | signal | points |
//! |--------|--------|
//! | exact normalized title | 30 |
//! | one title contains the other | 15 |
//! | item type matches | 10 |
//! | 4-digit year matches | 10 |
//! | season count matches (shows only) | 5 |

use crate::models::{CanonicalMedia, MatchCandidate, MediaType, ProviderSearchItem};

pub const EXACT_TITLE_POINTS: u32 = 30;
pub const PARTIAL_TITLE_POINTS: u32 = 15;
pub const TYPE_POINTS: u32 = 10;
pub const YEAR_POINTS: u32 = 10;
pub const SEASONS_POINTS: u32 = 5;

/// Highest attainable score
pub const MAX_SCORE: u32 =
    EXACT_TITLE_POINTS + TYPE_POINTS + YEAR_POINTS + SEASONS_POINTS;

/// Default minimum score for a candidate to be used
pub const DEFAULT_MIN_SCORE: u32 = 20;

/// Transliterate to ASCII, lowercase, keep only alphanumerics and single spaces.
///
/// Idempotent: `normalize_title(&normalize_title(x)) == normalize_title(x)`.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    let ascii = deunicode::deunicode(title).to_ascii_lowercase();
    let kept: String = ascii
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Map a free-form provider type label onto a media type.
#[must_use]
pub fn normalize_item_type(label: &str) -> Option<MediaType> {
    let label = label.to_ascii_lowercase();
    if label.contains("movie") {
        Some(MediaType::Movie)
    } else if label.contains("tv") || label.contains("show") || label.contains("series") {
        Some(MediaType::Show)
    } else {
        None
    }
}

/// First run of exactly four ASCII digits in a year or date string.
#[must_use]
pub fn four_digit_year(raw: &str) -> Option<i32> {
    let bytes = raw.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        if !bytes[start].is_ascii_digit() {
            start += 1;
            continue;
        }
        let end = bytes[start..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .map_or(bytes.len(), |len| start + len);
        if end - start == 4 {
            return raw[start..end].parse().ok();
        }
        start = end;
    }
    None
}

fn title_points(item_title: &str, media_title: &str) -> u32 {
    if item_title == media_title {
        EXACT_TITLE_POINTS
    } else if !item_title.is_empty()
        && !media_title.is_empty()
        && (item_title.contains(media_title) || media_title.contains(item_title))
    {
        PARTIAL_TITLE_POINTS
    } else {
        0
    }
}

/// Score a search item against the canonical media. Pure; range `0..=MAX_SCORE`.
#[must_use]
pub fn score(item: &ProviderSearchItem, media: &CanonicalMedia) -> u32 {
    score_normalized(item, media, &normalize_title(&media.title))
}

/// `score` with the media title already normalized, for scoring many items.
fn score_normalized(item: &ProviderSearchItem, media: &CanonicalMedia, media_title: &str) -> u32 {
    let mut total = title_points(&normalize_title(&item.title), media_title);

    if item.item_type.as_deref().and_then(normalize_item_type) == Some(media.media_type) {
        total += TYPE_POINTS;
    }

    if let (Some(year), Some(release_year)) =
        (item.year.as_deref().and_then(four_digit_year), media.release_year)
    {
        if year == release_year {
            total += YEAR_POINTS;
        }
    }

    if media.is_show() {
        if let (Some(seasons), Some(total_seasons)) = (item.seasons, media.total_seasons) {
            if seasons == total_seasons {
                total += SEASONS_POINTS;
            }
        }
    }

    total
}

/// Highest-scoring item with a non-empty title; ties go to the earliest item.
///
/// Selection ignores the acceptance threshold, callers gate on `score`.
#[must_use]
pub fn best_match<'a>(
    items: &'a [ProviderSearchItem],
    media: &CanonicalMedia,
) -> Option<MatchCandidate<'a>> {
    let media_title = normalize_title(&media.title);
    items
        .iter()
        .filter(|item| !item.title.trim().is_empty())
        .map(|item| MatchCandidate {
            item,
            score: score_normalized(item, media, &media_title),
        })
        .fold(None, |best: Option<MatchCandidate<'a>>, candidate| match best {
            Some(b) if b.score >= candidate.score => Some(b),
            _ => Some(candidate),
        })
}
