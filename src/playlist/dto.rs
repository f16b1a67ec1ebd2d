//! Playlist API Data Transfer Objects
//!
//! These types match EXACTLY what the xmplaylist-style API returns.
//! DO NOT use these types outside the playlist module - convert to domain
//! types via the adapter.
//!
//! Example most-heard response:
//! ```json
//! [{
//!   "track": {
//!     "title": "Dreams",
//!     "artists": ["Fleetwood Mac"]
//!   },
//!   "timesHeard": 42
//! }]
//! ```
//!
//! The API is not consistent about shapes: the entry list is sometimes
//! wrapped in `{"results": [...]}`, a track sometimes appears bare instead
//! of under a "track" key, and artists arrive either as plain strings or
//! as `{"name": ...}` objects. The DTOs absorb all observed variants.

use serde::Deserialize;

/// Station listing response (`GET /api/station`)
#[derive(Debug, Clone, Deserialize)]
pub struct StationsResponse {
    #[serde(default)]
    pub results: Vec<Station>,
}

/// A single station entry
#[derive(Debug, Clone, Deserialize)]
pub struct Station {
    /// URL slug, the identifier users pass as --channel
    pub deeplink: String,
    /// Human-readable station name
    pub name: Option<String>,
}

/// Most-heard listing response (`GET /api/station/{slug}/most-heard`)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MostHeardResponse {
    /// Bare entry list
    List(Vec<MostHeardEntry>),
    /// Entry list wrapped in a results object
    Wrapped {
        #[serde(default)]
        results: Vec<MostHeardEntry>,
    },
}

impl MostHeardResponse {
    pub fn into_entries(self) -> Vec<MostHeardEntry> {
        match self {
            Self::List(entries) => entries,
            Self::Wrapped { results } => results,
        }
    }
}

/// One listing entry, with or without the "track" wrapper
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MostHeardEntry {
    Wrapped { track: Track },
    Bare(Track),
}

impl MostHeardEntry {
    pub fn into_track(self) -> Track {
        match self {
            Self::Wrapped { track } => track,
            Self::Bare(track) => track,
        }
    }
}

/// Track info as the playlist API reports it
#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub title: Option<String>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    pub album: Option<String>,
}

/// Artist entry: plain string or object form
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Artist {
    Name(String),
    Object { name: Option<String> },
}

impl Artist {
    /// The artist name, if this entry carries one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name.as_str()),
            Self::Object { name } => name.as_deref(),
        }
    }
}
