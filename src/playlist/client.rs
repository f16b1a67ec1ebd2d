//! Playlist HTTP client
//!
//! Handles communication with the xmplaylist-style playlist service.
//! See: https://xmplaylist.com/api/documentation
//!
//! Listings are fetched as raw JSON text so the channel cache can mirror
//! the upstream response byte-for-byte; parsing happens after caching.

use crate::model::PipelineError;

/// Playlist API client
pub struct PlaylistClient {
    http_client: reqwest::Client,
    base_url: String,
}

/// User agent string sent with every request
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// How far back the most-heard listing looks
const MOST_HEARD_DAYS: u32 = 30;

impl PlaylistClient {
    /// Create a new client
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: "https://xmplaylist.com/api".to_string(),
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

    /// Fetch the station list as raw JSON text.
    pub async fn fetch_stations_raw(&self) -> Result<String, PipelineError> {
        let url = format!("{}/station", self.base_url);
        self.get_text(&url, None).await
    }

    /// Fetch a channel's most-heard listing as raw JSON text.
    ///
    /// A 404 from the station endpoint means the slug is unrecognized,
    /// which surfaces as `ChannelNotFound` rather than a transport error.
    pub async fn fetch_most_heard_raw(&self, slug: &str) -> Result<String, PipelineError> {
        let url = format!(
            "{}/station/{}/most-heard?days={}",
            self.base_url,
            urlencoding::encode(slug),
            MOST_HEARD_DAYS
        );
        self.get_text(&url, Some(slug)).await
    }

    /// Send a GET request and map status codes onto the pipeline taxonomy.
    async fn get_text(&self, url: &str, slug: Option<&str>) -> Result<String, PipelineError> {
        let response = self
            .http_client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| PipelineError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            if let Some(slug) = slug {
                return Err(PipelineError::ChannelNotFound(slug.to_string()));
            }
            return Err(PipelineError::ApiError(format!("HTTP 404 for {}", url)));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PipelineError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| PipelineError::UpstreamUnavailable(e.to_string()))
    }
}

impl Default for PlaylistClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = PlaylistClient::new();
        assert_eq!(client.base_url, "https://xmplaylist.com/api");
    }

    #[test]
    fn test_client_with_custom_url() {
        let client = PlaylistClient::with_base_url("http://localhost:8080");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_user_agent_format() {
        assert!(USER_AGENT.starts_with("sirius-sync/"));
    }
}
