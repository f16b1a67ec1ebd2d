//! Search API Data Transfer Objects
//!
//! These types match EXACTLY what the music search service returns.
//! DO NOT use these types outside the search module - convert to domain
//! types via the adapter.
//!
//! Example search response:
//! ```json
//! {
//!   "results": [{
//!     "id": "dQw4w9WgXcQ",
//!     "title": "Dreams",
//!     "artists": [{"name": "Fleetwood Mac"}],
//!     "category": "Songs"
//!   }]
//! }
//! ```

use serde::Deserialize;

/// Top-level search response
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    /// Error info if the request was rejected
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}

/// A single search result
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    /// Identifier accepted by the audio endpoint
    pub id: Option<String>,
    /// Track title
    pub title: Option<String>,
    /// Artists credited on the result
    #[serde(default)]
    pub artists: Vec<Artist>,
    /// Result category (only "Songs" entries are downloadable)
    pub category: Option<String>,
}

/// Artist info from the search service
#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "results": [{
                "id": "abc123",
                "title": "Dreams",
                "artists": [{"name": "Fleetwood Mac"}],
                "category": "Songs"
            }]
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].id.as_deref(), Some("abc123"));
        assert_eq!(response.results[0].artists[0].name, "Fleetwood Mac");
    }

    #[test]
    fn test_parse_empty_results() {
        let response: SearchResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(response.results.is_empty());
        assert!(response.error.is_none());
    }

    #[test]
    fn test_parse_error_payload() {
        let json = r#"{"error": {"code": 400, "message": "bad query"}}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.error.as_ref().unwrap().code, 400);
    }
}
