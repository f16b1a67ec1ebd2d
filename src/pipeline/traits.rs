//! Trait definitions for the upstream API clients.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! substitute mock implementations.

use async_trait::async_trait;

use crate::model::{ChannelRequest, PipelineError, TrackDescriptor};
use crate::playlist::ChannelSource;
use crate::search::{adapter, Artwork, SearchClient, SearchHit};

/// Trait for channel track listings.
#[async_trait]
pub trait ChannelApi: Send + Sync {
    /// Fetch the track descriptors for a channel.
    async fn fetch_tracks(
        &self,
        channel: &ChannelRequest,
    ) -> Result<Vec<TrackDescriptor>, PipelineError>;
}

/// Trait for song search.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Search the service for a free-text query, returning downloadable hits.
    async fn search_songs(&self, query: &str) -> Result<Vec<SearchHit>, PipelineError>;
}

/// Trait for audio and artwork download.
#[async_trait]
pub trait AudioApi: Send + Sync {
    /// Download MP3 audio for a search hit id.
    async fn download_audio(&self, source_id: &str, bitrate: u32)
        -> Result<Vec<u8>, PipelineError>;

    /// Download cover artwork for a search hit id, if any exists.
    async fn download_artwork(&self, source_id: &str) -> Result<Option<Artwork>, PipelineError>;
}

// Implement traits for real clients

#[async_trait]
impl ChannelApi for ChannelSource {
    async fn fetch_tracks(
        &self,
        channel: &ChannelRequest,
    ) -> Result<Vec<TrackDescriptor>, PipelineError> {
        self.fetch_tracks(channel).await
    }
}

#[async_trait]
impl SearchApi for SearchClient {
    async fn search_songs(&self, query: &str) -> Result<Vec<SearchHit>, PipelineError> {
        let response = self.search(query).await?;
        Ok(adapter::to_hits(response))
    }
}

#[async_trait]
impl AudioApi for SearchClient {
    async fn download_audio(
        &self,
        source_id: &str,
        bitrate: u32,
    ) -> Result<Vec<u8>, PipelineError> {
        self.download_audio(source_id, bitrate).await
    }

    async fn download_artwork(&self, source_id: &str) -> Result<Option<Artwork>, PipelineError> {
        self.download_artwork(source_id).await
    }
}

/// Mock clients returning configurable responses.
#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock channel source with per-slug listings.
    #[derive(Default)]
    pub struct MockChannels {
        listings: HashMap<String, Result<Vec<TrackDescriptor>, PipelineError>>,
    }

    impl MockChannels {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a listing for a slug.
        pub fn with_tracks(mut self, slug: &str, titles: &[(&str, &str)]) -> Self {
            let tracks = titles
                .iter()
                .map(|(title, artist)| TrackDescriptor {
                    title: title.to_string(),
                    artist: artist.to_string(),
                    album: None,
                    channel: ChannelRequest::new(slug),
                })
                .collect();
            self.listings.insert(slug.to_string(), Ok(tracks));
            self
        }

        /// Register an error for a slug.
        pub fn with_error(mut self, slug: &str, error: PipelineError) -> Self {
            self.listings.insert(slug.to_string(), Err(error));
            self
        }
    }

    #[async_trait]
    impl ChannelApi for MockChannels {
        async fn fetch_tracks(
            &self,
            channel: &ChannelRequest,
        ) -> Result<Vec<TrackDescriptor>, PipelineError> {
            match self.listings.get(channel.slug()) {
                Some(result) => result.clone(),
                None => Err(PipelineError::ChannelNotFound(channel.slug().to_string())),
            }
        }
    }

    /// Mock search service keyed by exact query text.
    ///
    /// Unregistered queries return an empty result set, which the
    /// resolver turns into NoMatch.
    #[derive(Default)]
    pub struct MockSearch {
        responses: HashMap<String, Result<Vec<SearchHit>, PipelineError>>,
    }

    impl MockSearch {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a single hit for a query.
        pub fn with_hit(mut self, query: &str, source_id: &str, artist: &str, title: &str) -> Self {
            self.responses.insert(
                query.to_string(),
                Ok(vec![SearchHit {
                    source_id: source_id.to_string(),
                    title: title.to_string(),
                    artist: artist.to_string(),
                }]),
            );
            self
        }

        /// Register an error for a query.
        pub fn with_error(mut self, query: &str, error: PipelineError) -> Self {
            self.responses.insert(query.to_string(), Err(error));
            self
        }
    }

    #[async_trait]
    impl SearchApi for MockSearch {
        async fn search_songs(&self, query: &str) -> Result<Vec<SearchHit>, PipelineError> {
            match self.responses.get(query) {
                Some(result) => result.clone(),
                None => Ok(vec![]),
            }
        }
    }

    /// Mock audio endpoint that counts download calls.
    ///
    /// Cloning shares the counter, so a test can hand one clone to the
    /// pipeline and query the other afterwards.
    #[derive(Clone)]
    pub struct MockAudio {
        data: Vec<u8>,
        error: Option<PipelineError>,
        downloads: std::sync::Arc<AtomicUsize>,
    }

    impl MockAudio {
        /// A mock that serves the given bytes for every id.
        pub fn serving(data: &[u8]) -> Self {
            Self {
                data: data.to_vec(),
                error: None,
                downloads: Default::default(),
            }
        }

        /// A mock whose downloads always fail.
        pub fn failing(error: PipelineError) -> Self {
            Self {
                data: vec![],
                error: Some(error),
                downloads: Default::default(),
            }
        }

        /// Number of download_audio calls observed.
        pub fn download_count(&self) -> usize {
            self.downloads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AudioApi for MockAudio {
        async fn download_audio(
            &self,
            _source_id: &str,
            _bitrate: u32,
        ) -> Result<Vec<u8>, PipelineError> {
            self.downloads.fetch_add(1, Ordering::SeqCst);
            match &self.error {
                Some(e) => Err(e.clone()),
                None => Ok(self.data.clone()),
            }
        }

        async fn download_artwork(
            &self,
            _source_id: &str,
        ) -> Result<Option<Artwork>, PipelineError> {
            Ok(None)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_channels_unknown_slug_is_not_found() {
            let mock = MockChannels::new();
            let err = mock
                .fetch_tracks(&ChannelRequest::new("nope"))
                .await
                .unwrap_err();
            assert!(matches!(err, PipelineError::ChannelNotFound(_)));
        }

        #[tokio::test]
        async fn test_mock_channels_registered_listing() {
            let mock = MockChannels::new().with_tracks("thebridge", &[("Dreams", "Fleetwood Mac")]);
            let tracks = mock
                .fetch_tracks(&ChannelRequest::new("thebridge"))
                .await
                .unwrap();
            assert_eq!(tracks.len(), 1);
            assert_eq!(tracks[0].artist, "Fleetwood Mac");
        }

        #[tokio::test]
        async fn test_mock_search_unregistered_query_is_empty() {
            let mock = MockSearch::new();
            assert!(mock.search_songs("anything").await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_mock_audio_counts_downloads() {
            let mock = MockAudio::serving(b"bytes");
            let _ = mock.download_audio("id", 192).await.unwrap();
            let _ = mock.download_audio("id", 192).await.unwrap();
            assert_eq!(mock.download_count(), 2);
        }
    }
}
