//! Channel source - turns a channel slug into track descriptors.
//!
//! # Architecture
//!
//! - **DTOs** (`dto.rs`) - Exact playlist API response shapes
//! - **Adapter** (`adapter.rs`) - Converts DTOs to domain descriptors,
//!   rejecting malformed entries at the boundary
//! - **Client** (`client.rs`) - HTTP client for the playlist API
//! - **Cache** (`cache.rs`) - Raw per-channel JSON cache on disk
//!
//! The source consults the cache before the network; a cached listing is
//! authoritative for the rest of the run (and for later runs, until the
//! cache file is deleted by hand).

pub mod adapter;
pub mod cache;
pub mod client;
pub mod dto;

pub use cache::ChannelCache;
pub use client::PlaylistClient;

use crate::model::{ChannelRequest, PipelineError, TrackDescriptor};

/// Channel source backed by the playlist API and a disk cache.
pub struct ChannelSource {
    client: PlaylistClient,
    cache: ChannelCache,
}

impl ChannelSource {
    pub fn new(client: PlaylistClient, cache: ChannelCache) -> Self {
        Self { client, cache }
    }

    /// Fetch the track listing for a channel.
    ///
    /// Serves from the disk cache when a listing for the slug exists;
    /// otherwise fetches from the API and caches the raw response before
    /// parsing it.
    pub async fn fetch_tracks(
        &self,
        channel: &ChannelRequest,
    ) -> Result<Vec<TrackDescriptor>, PipelineError> {
        let raw = match self.cache.get(channel.slug()) {
            Some(raw) => {
                tracing::debug!(channel = %channel, "Using cached channel listing");
                raw
            }
            None => {
                let raw = self.client.fetch_most_heard_raw(channel.slug()).await?;
                if let Err(e) = self.cache.put(channel.slug(), &raw) {
                    tracing::warn!(channel = %channel, error = %e, "Failed to cache channel listing");
                }
                raw
            }
        };

        let response: dto::MostHeardResponse =
            serde_json::from_str(&raw).map_err(|e| PipelineError::Parse(e.to_string()))?;

        let tracks = adapter::to_descriptors(response, channel);
        tracing::info!(channel = %channel, tracks = tracks.len(), "Channel listing loaded");
        Ok(tracks)
    }

    /// Refresh the station list from the API and persist it to the cache.
    ///
    /// Returns the sorted channel slugs.
    pub async fn refresh_stations(&self) -> Result<Vec<String>, PipelineError> {
        let raw = self.client.fetch_stations_raw().await?;
        if let Err(e) = self.cache.put_stations(&raw) {
            tracing::warn!(error = %e, "Failed to cache station list");
        }

        let response: dto::StationsResponse =
            serde_json::from_str(&raw).map_err(|e| PipelineError::Parse(e.to_string()))?;

        let mut slugs: Vec<String> = response
            .results
            .into_iter()
            .map(|station| station.deeplink)
            .collect();
        slugs.sort();
        Ok(slugs)
    }

    /// Known channel slugs from the cached station list, if present.
    pub fn known_channels(&self) -> Option<Vec<String>> {
        let raw = self.cache.get_stations()?;
        let response: dto::StationsResponse = serde_json::from_str(&raw).ok()?;
        let mut slugs: Vec<String> = response
            .results
            .into_iter()
            .map(|station| station.deeplink)
            .collect();
        slugs.sort();
        Some(slugs)
    }
}
