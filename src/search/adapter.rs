//! Convert search API DTOs into scoring-ready hits.
//!
//! Results without an id or a title, and results outside the "Songs"
//! category, are rejected here; the resolver only ever sees downloadable
//! candidates.

use super::dto;

/// A downloadable search result, before scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub source_id: String,
    pub title: String,
    pub artist: String,
}

/// Convert a search response to hits, preserving result order.
pub fn to_hits(response: dto::SearchResponse) -> Vec<SearchHit> {
    response
        .results
        .into_iter()
        .filter_map(to_hit)
        .collect()
}

fn to_hit(result: dto::SearchResult) -> Option<SearchHit> {
    // Category is absent on some deployments; only an explicit non-Songs
    // category disqualifies a result.
    if matches!(result.category.as_deref(), Some(c) if c != "Songs") {
        return None;
    }

    let source_id = result.id?;
    let title = result.title?;
    if source_id.is_empty() || title.trim().is_empty() {
        return None;
    }

    let artist = result
        .artists
        .iter()
        .map(|a| a.name.as_str())
        .filter(|name| !name.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    Some(SearchHit {
        source_id,
        title,
        artist,
    })
}
