//! Match resolver - finds a downloadable item for a track descriptor.
//!
//! # Architecture
//!
//! - **DTOs** (`dto.rs`) - Exact search API response shapes
//! - **Adapter** (`adapter.rs`) - Converts DTOs to downloadable hits
//! - **Client** (`client.rs`) - HTTP client for search/audio/artwork
//! - **Scoring** (`scoring.rs`) - Normalized text similarity
//!
//! Selection is a pure function over the hits a search returned: each hit
//! is scored against the descriptor's "artist title" form, and the best
//! hit wins if it clears the acceptance threshold. An empty result set or
//! an all-below-threshold one is a NoMatch, never an error.

pub mod adapter;
pub mod client;
pub mod dto;
pub mod scoring;

pub use adapter::SearchHit;
pub use client::{Artwork, SearchClient};

use crate::model::{MatchCandidate, TrackDescriptor};

/// Pick the best-scoring hit for a descriptor, if any clears the threshold.
///
/// Ties are broken first-seen: a later hit replaces the current best only
/// with a strictly higher score, so the service's own ranking decides
/// between equally-similar results.
pub fn select_candidate(
    track: &TrackDescriptor,
    hits: Vec<SearchHit>,
    min_confidence: f32,
) -> Option<MatchCandidate> {
    let reference = track.search_query();

    let mut best: Option<MatchCandidate> = None;
    for hit in hits {
        let combined = format!("{} {}", hit.artist, hit.title);
        let confidence = scoring::similarity(&combined, &reference);

        tracing::trace!(
            track = %track,
            candidate = %combined,
            confidence,
            "Scored search hit"
        );

        let is_better = match &best {
            Some(current) => confidence > current.confidence,
            None => true,
        };
        if is_better {
            best = Some(MatchCandidate {
                source_id: hit.source_id,
                title: hit.title,
                artist: hit.artist,
                confidence,
            });
        }
    }

    match best {
        Some(candidate) if candidate.confidence >= min_confidence => {
            tracing::debug!(
                track = %track,
                source_id = %candidate.source_id,
                matched = %format!("{} - {}", candidate.artist, candidate.title),
                confidence = candidate.confidence,
                "Accepted match"
            );
            Some(candidate)
        }
        Some(candidate) => {
            tracing::debug!(
                track = %track,
                confidence = candidate.confidence,
                threshold = min_confidence,
                "Best hit below threshold"
            );
            None
        }
        None => None,
    }
}
