//! Batch orchestrator - drives channels through resolve and download.
//!
//! # Architecture
//!
//! Channel listings are fetched serially (one cache write per channel),
//! then each channel's tracks fan out across a bounded worker pool via
//! `buffer_unordered`. Every dispatched track yields exactly one outcome;
//! outcome order within a channel is not defined, but outcomes stay
//! grouped per channel. Nothing aborts the batch: a failed channel is
//! reported and skipped, a failed track becomes a DownloadFailed outcome.
//!
//! Per track: Pending -> Resolving -> {NoMatch | Resolved} ->
//! (if downloading) Downloading -> {Success | DownloadFailed};
//! dry runs and already-present files terminate as Skipped.

pub mod traits;

use std::collections::HashSet;
use std::path::Path;

use futures::StreamExt;

use crate::fetch::Fetcher;
use crate::model::{ChannelRequest, DownloadOutcome, OutcomeStatus, PipelineError, TrackDescriptor};
use crate::naming;
use crate::search;
use traits::{AudioApi, ChannelApi, SearchApi};

/// Orchestrator settings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Minimum similarity score to accept a candidate
    pub min_confidence: f32,
    /// Requested MP3 bitrate
    pub bitrate: u32,
    /// Bounded worker-pool size for track fan-out
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.6,
            bitrate: 192,
            workers: 4,
        }
    }
}

/// All outcomes for one requested channel.
#[derive(Debug)]
pub struct ChannelReport {
    pub channel: ChannelRequest,
    pub outcomes: Vec<DownloadOutcome>,
    /// Set when the channel listing itself could not be fetched
    pub error: Option<PipelineError>,
}

impl ChannelReport {
    fn completed(channel: ChannelRequest, outcomes: Vec<DownloadOutcome>) -> Self {
        Self {
            channel,
            outcomes,
            error: None,
        }
    }

    fn failed(channel: ChannelRequest, error: PipelineError) -> Self {
        Self {
            channel,
            outcomes: vec![],
            error: Some(error),
        }
    }

    /// Tally this channel's outcomes by status.
    pub fn tally(&self) -> Tally {
        let mut tally = Tally::default();
        for outcome in &self.outcomes {
            match outcome.status {
                OutcomeStatus::Success => tally.success += 1,
                OutcomeStatus::NoMatch => tally.no_match += 1,
                OutcomeStatus::DownloadFailed => tally.failed += 1,
                OutcomeStatus::Skipped => tally.skipped += 1,
            }
        }
        tally
    }
}

/// Aggregate outcome counts across one or more channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub success: usize,
    pub no_match: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Tally {
    pub fn merge(&mut self, other: Tally) {
        self.success += other.success;
        self.no_match += other.no_match;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }

    pub fn total(&self) -> usize {
        self.success + self.no_match + self.failed + self.skipped
    }
}

impl std::fmt::Display for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} success, {} no match, {} failed, {} skipped",
            self.success, self.no_match, self.failed, self.skipped
        )
    }
}

/// Drives the channel source, resolver and fetcher over a batch of channels.
pub struct Orchestrator<C, S, A> {
    channels: C,
    search: S,
    audio: A,
    fetcher: Fetcher,
    config: PipelineConfig,
}

impl<C, S, A> Orchestrator<C, S, A>
where
    C: ChannelApi,
    S: SearchApi,
    A: AudioApi,
{
    pub fn new(channels: C, search: S, audio: A, config: PipelineConfig) -> Self {
        Self {
            channels,
            search,
            audio,
            fetcher: Fetcher::new(config.bitrate),
            config,
        }
    }

    /// Process each requested channel, returning per-channel reports.
    ///
    /// When `do_download` is false (dry run), tracks stop after resolution:
    /// resolved tracks are recorded as Skipped and nothing touches the
    /// destination tree.
    pub async fn run(
        &self,
        requests: &[ChannelRequest],
        destination: &Path,
        do_download: bool,
    ) -> Vec<ChannelReport> {
        let mut reports = Vec::with_capacity(requests.len());

        for channel in requests {
            let tracks = match self.channels.fetch_tracks(channel).await {
                Ok(tracks) => tracks,
                Err(e) => {
                    tracing::warn!(channel = %channel, error = %e, "Skipping channel");
                    reports.push(ChannelReport::failed(channel.clone(), e));
                    continue;
                }
            };

            tracing::info!(
                channel = %channel,
                tracks = tracks.len(),
                workers = self.config.workers,
                dry_run = !do_download,
                "Processing channel"
            );

            // Listings can repeat a track, or carry two tracks whose
            // metadata slugs to the same file. Only the first entry per
            // target path is dispatched; the rest would race the
            // existence check and overwrite each other's temp file.
            let mut outcomes = Vec::with_capacity(tracks.len());
            let mut targets = HashSet::new();
            let mut pending = Vec::with_capacity(tracks.len());
            for track in tracks {
                if targets.insert(naming::track_path(destination, &track)) {
                    pending.push(track);
                } else {
                    tracing::debug!(track = %track, "Duplicate target path in listing, skipping");
                    outcomes.push(DownloadOutcome::skipped(track));
                }
            }

            let mut processed = futures::stream::iter(pending)
                .map(|track| self.process_track(track, destination, do_download))
                .buffer_unordered(self.config.workers.max(1))
                .collect::<Vec<_>>()
                .await;
            outcomes.append(&mut processed);

            let report = ChannelReport::completed(channel.clone(), outcomes);
            tracing::info!(channel = %channel, tally = %report.tally(), "Channel done");
            reports.push(report);
        }

        reports
    }

    /// Resolve and (optionally) download a single track.
    async fn process_track(
        &self,
        track: TrackDescriptor,
        destination: &Path,
        do_download: bool,
    ) -> DownloadOutcome {
        let query = track.search_query();

        let hits = match self.search.search_songs(&query).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(track = %track, error = %e, "Search failed");
                return DownloadOutcome::failed(track, e.to_string());
            }
        };

        let Some(candidate) = search::select_candidate(&track, hits, self.config.min_confidence)
        else {
            return DownloadOutcome::no_match(track);
        };

        if !do_download {
            tracing::info!(track = %track, source_id = %candidate.source_id, "DRY RUN: would download");
            return DownloadOutcome::skipped(track);
        }

        self.fetcher
            .fetch(&self.audio, &candidate, &track, destination)
            .await
    }
}
