//! Audio fetcher - downloads a matched track and embeds metadata.
//!
//! The fetcher owns everything after resolution: the idempotence check,
//! the download, the atomic write into the per-channel folder, and the
//! lofty tag/artwork embed. It never propagates an error upward - every
//! failure is captured in the returned outcome so one bad track cannot
//! take the batch down.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag, TagExt};

use crate::model::{DownloadOutcome, MatchCandidate, TrackDescriptor};
use crate::naming;
use crate::pipeline::traits::AudioApi;
use crate::search::Artwork;

/// Downloads matched tracks into a destination tree.
pub struct Fetcher {
    bitrate: u32,
}

impl Fetcher {
    /// Create a fetcher requesting MP3 at the given bitrate.
    pub fn new(bitrate: u32) -> Self {
        Self { bitrate }
    }

    /// Download one matched track, returning its outcome.
    ///
    /// If the target file already exists the download is skipped entirely,
    /// including the network calls - re-runs are free for finished tracks.
    pub async fn fetch<A: AudioApi + ?Sized>(
        &self,
        audio: &A,
        candidate: &MatchCandidate,
        track: &TrackDescriptor,
        destination: &Path,
    ) -> DownloadOutcome {
        let path = naming::track_path(destination, track);

        if path.exists() {
            tracing::warn!(track = %track, path = %path.display(), "File already exists, skipping");
            return DownloadOutcome::skipped(track.clone());
        }

        match self.download_to(audio, candidate, track, &path).await {
            Ok(()) => {
                tracing::info!(track = %track, path = %path.display(), "Downloaded");
                DownloadOutcome::success(track.clone(), path)
            }
            Err(e) => {
                tracing::error!(track = %track, error = %e, "Download failed");
                DownloadOutcome::failed(track.clone(), e.to_string())
            }
        }
    }

    async fn download_to<A: AudioApi + ?Sized>(
        &self,
        audio: &A,
        candidate: &MatchCandidate,
        track: &TrackDescriptor,
        path: &PathBuf,
    ) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let data = audio
            .download_audio(&candidate.source_id, self.bitrate)
            .await
            .with_context(|| format!("Failed to download audio for {}", candidate.source_id))?;

        // Write to a temp name, then rename: an interrupted run never
        // leaves a half-written file that a later run would mistake for
        // a finished download.
        let temp_path = path.with_extension("mp3.part");
        tokio::fs::write(&temp_path, &data)
            .await
            .with_context(|| format!("Failed to write {:?}", temp_path))?;
        tokio::fs::rename(&temp_path, path)
            .await
            .with_context(|| format!("Failed to rename {:?}", temp_path))?;

        // Artwork and tags are best-effort: the audio is on disk and the
        // idempotence key is the file itself.
        let artwork = match audio.download_artwork(&candidate.source_id).await {
            Ok(artwork) => artwork,
            Err(e) => {
                tracing::warn!(track = %track, error = %e, "Artwork download failed");
                None
            }
        };

        if let Err(e) = embed_tags(path, track, artwork.as_ref()) {
            tracing::warn!(track = %track, error = %e, "Tag embed failed");
        }

        Ok(())
    }
}

/// Write title/artist/album tags and optional front-cover artwork.
pub fn embed_tags(path: &Path, track: &TrackDescriptor, artwork: Option<&Artwork>) -> Result<()> {
    let mut tagged_file = Probe::open(path)
        .context("Failed to open file for tagging")?
        .read()
        .context("Failed to read file for tagging")?;

    let tag_type = tagged_file.primary_tag_type();
    let tag = if let Some(tag) = tagged_file.tag_mut(tag_type) {
        tag
    } else {
        tagged_file.insert_tag(Tag::new(tag_type));
        tagged_file.tag_mut(tag_type).expect("Just inserted tag")
    };

    tag.set_title(track.title.clone());
    tag.set_artist(track.artist.clone());
    if let Some(ref album) = track.album {
        tag.set_album(album.clone());
    }

    if let Some(artwork) = artwork {
        let mime_type = if artwork.mime_type.contains("png") {
            MimeType::Png
        } else {
            MimeType::Jpeg
        };
        tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            Some(mime_type),
            None,
            artwork.data.clone(),
        ));
    }

    tag.save_to_path(path, WriteOptions::default())
        .context("Failed to write tags to file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChannelRequest, OutcomeStatus, PipelineError};
    use crate::pipeline::traits::mocks::MockAudio;
    use tempfile::tempdir;

    fn track() -> TrackDescriptor {
        TrackDescriptor {
            title: "Dreams".to_string(),
            artist: "Fleetwood Mac".to_string(),
            album: None,
            channel: ChannelRequest::new("thebridge"),
        }
    }

    fn candidate() -> MatchCandidate {
        MatchCandidate {
            source_id: "abc123".to_string(),
            title: "Dreams".to_string(),
            artist: "Fleetwood Mac".to_string(),
            confidence: 1.0,
        }
    }

    #[tokio::test]
    async fn test_fetch_writes_expected_path() {
        let temp = tempdir().unwrap();
        let audio = MockAudio::serving(b"audio-bytes");

        let outcome = Fetcher::new(192)
            .fetch(&audio, &candidate(), &track(), temp.path())
            .await;

        assert_eq!(outcome.status, OutcomeStatus::Success);
        let path = outcome.file_path.unwrap();
        assert_eq!(
            path,
            temp.path().join("thebridge/fleetwood-mac-dreams.mp3")
        );
        assert_eq!(std::fs::read(&path).unwrap(), b"audio-bytes");
    }

    #[tokio::test]
    async fn test_existing_file_skips_without_download() {
        let temp = tempdir().unwrap();
        let channel_dir = temp.path().join("thebridge");
        std::fs::create_dir_all(&channel_dir).unwrap();
        std::fs::write(channel_dir.join("fleetwood-mac-dreams.mp3"), b"old").unwrap();

        let audio = MockAudio::serving(b"new");
        let outcome = Fetcher::new(192)
            .fetch(&audio, &candidate(), &track(), temp.path())
            .await;

        assert_eq!(outcome.status, OutcomeStatus::Skipped);
        assert_eq!(audio.download_count(), 0);
        // The existing file is untouched
        assert_eq!(
            std::fs::read(temp.path().join("thebridge/fleetwood-mac-dreams.mp3")).unwrap(),
            b"old"
        );
    }

    #[tokio::test]
    async fn test_download_error_is_captured_locally() {
        let temp = tempdir().unwrap();
        let audio = MockAudio::failing(PipelineError::UpstreamUnavailable("timeout".to_string()));

        let outcome = Fetcher::new(192)
            .fetch(&audio, &candidate(), &track(), temp.path())
            .await;

        assert_eq!(outcome.status, OutcomeStatus::DownloadFailed);
        assert!(outcome.error.unwrap().contains("abc123"));
        assert!(outcome.file_path.is_none());
        // No partial file left behind
        assert!(!temp.path().join("thebridge/fleetwood-mac-dreams.mp3").exists());
    }

    #[test]
    fn test_embed_tags_rejects_non_audio_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("not-audio.mp3");
        std::fs::write(&path, b"definitely not mpeg").unwrap();

        // Tagging garbage bytes must error rather than panic; the fetcher
        // treats that error as a warning, not a failed download.
        assert!(embed_tags(&path, &track(), None).is_err());
    }
}
