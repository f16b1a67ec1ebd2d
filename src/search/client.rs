//! Music search service HTTP client
//!
//! Handles the search, audio, and artwork endpoints of the streaming
//! search service. Audio is requested as MP3 with a caller-chosen bitrate;
//! the transcode happens service-side.

use super::dto;
use crate::model::PipelineError;

/// Downloaded artwork bytes
#[derive(Debug, Clone)]
pub struct Artwork {
    /// Image data (JPEG or PNG)
    pub data: Vec<u8>,
    /// MIME type as reported by the service
    pub mime_type: String,
}

/// Search service client
#[derive(Clone)]
pub struct SearchClient {
    http_client: reqwest::Client,
    base_url: String,
}

/// Results requested per search; the scorer only needs the top handful
const SEARCH_LIMIT: u32 = 10;

impl SearchClient {
    /// Create a new client
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: "https://music.youtube.com/api".to_string(),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Run a song search for a free-text query.
    pub async fn search(&self, query: &str) -> Result<dto::SearchResponse, PipelineError> {
        let url = format!(
            "{}/search?q={}&filter=songs&limit={}",
            self.base_url,
            urlencoding::encode(query),
            SEARCH_LIMIT
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| PipelineError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PipelineError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::UpstreamUnavailable(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed = response
            .json::<dto::SearchResponse>()
            .await
            .map_err(|e| PipelineError::Parse(e.to_string()))?;

        if let Some(error) = &parsed.error {
            return Err(PipelineError::ApiError(format!(
                "{} ({})",
                error.message, error.code
            )));
        }

        Ok(parsed)
    }

    /// Download audio for a search result id as MP3 at the given bitrate.
    pub async fn download_audio(
        &self,
        source_id: &str,
        bitrate: u32,
    ) -> Result<Vec<u8>, PipelineError> {
        let url = format!(
            "{}/audio/{}?format=mp3&bitrate={}",
            self.base_url,
            urlencoding::encode(source_id),
            bitrate
        );
        let (data, _) = self
            .download_bytes(&url)
            .await?
            .ok_or_else(|| PipelineError::ApiError(format!("No audio available for {}", source_id)))?;
        Ok(data)
    }

    /// Download cover artwork for a search result id, if the service has any.
    ///
    /// Missing artwork is normal, not a failure.
    pub async fn download_artwork(
        &self,
        source_id: &str,
    ) -> Result<Option<Artwork>, PipelineError> {
        let url = format!("{}/artwork/{}", self.base_url, urlencoding::encode(source_id));

        let artwork = self
            .download_bytes(&url)
            .await?
            .map(|(data, mime_type)| Artwork { data, mime_type });
        Ok(artwork)
    }

    /// Fetch a URL's body and content type. A 404 is `Ok(None)` so each
    /// caller decides whether a missing resource is an error.
    async fn download_bytes(&self, url: &str) -> Result<Option<(Vec<u8>, String)>, PipelineError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PipelineError::RateLimited);
        }

        if !status.is_success() {
            return Err(PipelineError::ApiError(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = response
            .bytes()
            .await
            .map_err(|e| PipelineError::UpstreamUnavailable(e.to_string()))?;

        Ok(Some((data.to_vec(), mime_type)))
    }
}

impl Default for SearchClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Serve a single canned HTTP response for every connection.
    fn stub_server(response: &'static str) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                use std::io::{Read, Write};
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_client_creation() {
        let client = SearchClient::new();
        assert_eq!(client.base_url, "https://music.youtube.com/api");
    }

    #[test]
    fn test_client_with_custom_url() {
        let client = SearchClient::with_base_url("http://localhost:8080");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_missing_artwork_is_none() {
        let base = stub_server("HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\n\r\n");
        let client = SearchClient::with_base_url(base);

        let artwork = client.download_artwork("gone").await.unwrap();
        assert!(artwork.is_none());
    }

    #[tokio::test]
    async fn test_missing_audio_is_an_error() {
        let base = stub_server("HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\n\r\n");
        let client = SearchClient::with_base_url(base);

        let err = client.download_audio("gone", 192).await.unwrap_err();
        assert!(matches!(err, PipelineError::ApiError(_)));
    }

    #[tokio::test]
    async fn test_artwork_carries_content_type() {
        let base = stub_server(
            "HTTP/1.1 200 OK\r\ncontent-type: image/png\r\ncontent-length: 3\r\n\r\nPNG",
        );
        let client = SearchClient::with_base_url(base);

        let artwork = client.download_artwork("cover").await.unwrap().unwrap();
        assert_eq!(artwork.mime_type, "image/png");
        assert_eq!(artwork.data, b"PNG");
    }
}
