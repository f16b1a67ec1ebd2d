//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\sirius-sync\config.toml
//! - macOS: ~/Library/Application Support/sirius-sync/config.toml
//! - Linux: ~/.config/sirius-sync/config.toml
//!
//! The config file is human-readable and editable. Settings are loaded
//! at startup; every field has a default so a missing or partial file
//! still yields a usable config.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Match acceptance settings
    pub matching: MatchingConfig,

    /// Download settings
    pub download: DownloadConfig,

    /// Cache settings
    pub cache: CacheConfig,
}

/// Settings for accepting or rejecting search results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum similarity score to accept a candidate (0.0 - 1.0).
    /// The upstream cutoff is not pinned down anywhere, so it stays
    /// a tunable rather than a constant.
    pub min_confidence: f32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.6,
        }
    }
}

/// Download worker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Number of parallel track workers (0 = derive from CPU count)
    pub workers: usize,

    /// Requested MP3 bitrate in kbit/s
    pub bitrate: u32,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            bitrate: 192,
        }
    }
}

impl DownloadConfig {
    /// Effective worker-pool size. The work is I/O bound and the
    /// upstreams are rate-sensitive, so the derived default is capped.
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
            .min(8)
    }
}

/// Channel cache settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory override (default: OS cache dir / sirius-sync)
    pub dir: Option<PathBuf>,
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sirius-sync"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        // Write the defaults so there is a file for users to edit
        if let Err(e) = save(&Config::default()) {
            tracing::warn!("Could not write default config: {}", e);
        }
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("config.toml");

    // Ensure directory exists
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDir(dir.clone(), e))?;

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[matching]"));
        assert!(toml.contains("[download]"));
        assert!(toml.contains("[cache]"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.matching.min_confidence = 0.75;
        config.download.workers = 2;
        config.cache.dir = Some(PathBuf::from("/tmp/cache"));

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(parsed.matching.min_confidence, 0.75);
        assert_eq!(parsed.download.workers, 2);
        assert_eq!(parsed.cache.dir, Some(PathBuf::from("/tmp/cache")));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        // Config with only some fields
        let toml = r#"
[download]
bitrate = 320
"#;
        let config: Config = toml::from_str(toml).unwrap();

        // Specified field is set
        assert_eq!(config.download.bitrate, 320);

        // Other fields use defaults
        assert_eq!(config.matching.min_confidence, 0.6);
        assert_eq!(config.download.workers, 0);
        assert!(config.cache.dir.is_none());
    }

    #[test]
    fn test_effective_workers_explicit_wins() {
        let config = DownloadConfig {
            workers: 3,
            bitrate: 192,
        };
        assert_eq!(config.effective_workers(), 3);
    }

    #[test]
    fn test_effective_workers_default_is_bounded() {
        let config = DownloadConfig::default();
        let workers = config.effective_workers();
        assert!(workers >= 1);
        assert!(workers <= 8);
    }
}
