//! Convert playlist API DTOs into domain track descriptors.
//!
//! Malformed entries (no title, no usable artist) are rejected here at the
//! boundary rather than carried inward as partially-filled descriptors.

use super::dto;
use crate::model::{ChannelRequest, TrackDescriptor};

/// Convert a most-heard response into track descriptors for a channel.
///
/// Entries without a title or without at least one named artist are
/// dropped with a debug log line; the rest of the listing is unaffected.
pub fn to_descriptors(
    response: dto::MostHeardResponse,
    channel: &ChannelRequest,
) -> Vec<TrackDescriptor> {
    response
        .into_entries()
        .into_iter()
        .map(dto::MostHeardEntry::into_track)
        .filter_map(|track| to_descriptor(track, channel))
        .collect()
}

fn to_descriptor(track: dto::Track, channel: &ChannelRequest) -> Option<TrackDescriptor> {
    let title = match track.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => {
            tracing::debug!(channel = %channel, "Dropping listing entry without a title");
            return None;
        }
    };

    let artist_names: Vec<&str> = track
        .artists
        .iter()
        .filter_map(dto::Artist::name)
        .filter(|name| !name.trim().is_empty())
        .collect();

    if artist_names.is_empty() {
        tracing::debug!(channel = %channel, title = %title, "Dropping listing entry without artists");
        return None;
    }

    Some(TrackDescriptor {
        title,
        artist: artist_names.join(", "),
        album: track.album.filter(|album| !album.trim().is_empty()),
        channel: channel.clone(),
    })
}
