//! Internal domain models for the sync pipeline.
//!
//! These types are OUR types - they don't change when upstream APIs change.
//! All external API responses get converted into these types via adapters.

use std::path::PathBuf;

/// A channel slug as supplied by the user (e.g. "thebridge").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelRequest(String);

impl ChannelRequest {
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// The raw channel slug.
    pub fn slug(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChannelRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelRequest {
    fn from(slug: &str) -> Self {
        Self::new(slug)
    }
}

/// A track as reported by the playlist API for one channel.
///
/// Read-only once produced by the channel source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDescriptor {
    /// Track title
    pub title: String,
    /// Artist name (multiple artists joined with ", ")
    pub artist: String,
    /// Album title, when the playlist API reports one
    pub album: Option<String>,
    /// Channel this track was heard on
    pub channel: ChannelRequest,
}

impl TrackDescriptor {
    /// "artist title" form used as the search query and the scoring reference.
    pub fn search_query(&self) -> String {
        format!("{} {}", self.artist, self.title)
    }
}

impl std::fmt::Display for TrackDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

/// A downloadable item returned by the search service, scored against
/// the descriptor it was resolved for.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    /// Opaque identifier the audio endpoint accepts
    pub source_id: String,
    /// Title as reported by the search service
    pub title: String,
    /// Artist as reported by the search service
    pub artist: String,
    /// Normalized similarity against the descriptor, in [0, 1]
    pub confidence: f32,
}

/// Terminal status of one track's trip through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Audio downloaded and tagged
    Success,
    /// No candidate met the acceptance threshold
    NoMatch,
    /// Download or tagging failed locally
    DownloadFailed,
    /// Dry run, or the target file already existed
    Skipped,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NoMatch => "no match",
            Self::DownloadFailed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// The single record every descriptor fed into the pipeline yields.
///
/// Invariant: `file_path` is `Some` exactly when `status` is `Success`.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub track: TrackDescriptor,
    pub status: OutcomeStatus,
    pub file_path: Option<PathBuf>,
    pub error: Option<String>,
}

impl DownloadOutcome {
    pub fn success(track: TrackDescriptor, file_path: PathBuf) -> Self {
        Self {
            track,
            status: OutcomeStatus::Success,
            file_path: Some(file_path),
            error: None,
        }
    }

    pub fn no_match(track: TrackDescriptor) -> Self {
        Self {
            track,
            status: OutcomeStatus::NoMatch,
            file_path: None,
            error: None,
        }
    }

    pub fn failed(track: TrackDescriptor, error: impl Into<String>) -> Self {
        Self {
            track,
            status: OutcomeStatus::DownloadFailed,
            file_path: None,
            error: Some(error.into()),
        }
    }

    pub fn skipped(track: TrackDescriptor) -> Self {
        Self {
            track,
            status: OutcomeStatus::Skipped,
            file_path: None,
            error: None,
        }
    }
}

/// Errors that can occur while talking to the upstream APIs.
///
/// `NoMatch` is deliberately not here - an empty search result is an
/// expected outcome, not an error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    #[error("Channel not recognized upstream: {0}")]
    ChannelNotFound(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("API request rejected: {0}")]
    ApiError(String),

    #[error("Rate limited - try again later")]
    RateLimited,
}
