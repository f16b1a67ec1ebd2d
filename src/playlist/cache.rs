//! Channel listing disk cache.
//!
//! Stores raw upstream JSON per channel so repeated runs (and repeated
//! channels within a run) skip the playlist API. Entries are never
//! expired automatically; stale data is cleared by deleting the files.

use std::fs;
use std::io;
use std::path::PathBuf;

/// Disk cache for raw playlist API responses.
pub struct ChannelCache {
    cache_dir: PathBuf,
}

impl ChannelCache {
    /// Create a new cache rooted at the given directory.
    ///
    /// An unusable cache directory is reported once here; the cache then
    /// degrades to pass-through (every `get` misses, every `put` errors).
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        let cache_dir = cache_dir.into();
        if let Err(e) = fs::create_dir_all(cache_dir.join("channels")) {
            tracing::warn!(dir = %cache_dir.display(), error = %e, "Could not create cache directory");
        }
        Self { cache_dir }
    }

    /// Create a cache in the default location (user cache directory).
    pub fn default_location() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("sirius-sync");
        Self::new(cache_dir)
    }

    /// Get the cached raw listing for a channel slug.
    pub fn get(&self, slug: &str) -> Option<String> {
        let path = self.channel_path(slug);
        if !path.exists() {
            return None;
        }
        fs::read_to_string(&path).ok()
    }

    /// Store a raw listing for a channel slug.
    pub fn put(&self, slug: &str, raw: &str) -> io::Result<PathBuf> {
        let path = self.channel_path(slug);
        fs::write(&path, raw)?;
        Ok(path)
    }

    /// Store the raw station list.
    pub fn put_stations(&self, raw: &str) -> io::Result<PathBuf> {
        let path = self.stations_path();
        fs::write(&path, raw)?;
        Ok(path)
    }

    /// Get the cached raw station list.
    pub fn get_stations(&self) -> Option<String> {
        fs::read_to_string(self.stations_path()).ok()
    }

    fn channel_path(&self, slug: &str) -> PathBuf {
        // Slugs come from user input; keep them from escaping the cache dir
        let safe: String = slug
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.cache_dir.join("channels").join(format!("{}.json", safe))
    }

    fn stations_path(&self) -> PathBuf {
        self.cache_dir.join("stations.json")
    }
}
