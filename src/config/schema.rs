//! Configuration schema for Hoard
//!
//! Configuration is stored at `~/.config/hoard/config.toml`

use crate::cache::{mb_to_bytes, Ceiling};
use crate::store::DEFAULT_MAX_FILE_BYTES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Record file settings
    pub store: StoreConfig,

    /// Artifact cache settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
        }
    }
}

/// Record file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding record files (default: state dir)
    pub data_dir: Option<PathBuf>,

    /// Largest record file accepted for reading or writing
    pub max_file_bytes: u64,

    /// Permission records, relative to the data dir
    pub permissions_file: String,

    /// Voice preference records, relative to the data dir
    pub preferences_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            permissions_file: "permissions.json".to_string(),
            preferences_file: "voices.json".to_string(),
        }
    }
}

impl StoreConfig {
    /// Resolve the data directory, falling back to `state_dir`
    pub fn data_dir_or(&self, state_dir: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| state_dir.join("data"))
    }
}

/// Artifact cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache root (default: state dir)
    pub dir: Option<PathBuf>,

    /// Where artifacts are generated before admission (default: state dir)
    pub staging_dir: Option<PathBuf>,

    /// Maximum total cache size in MB
    pub max_total_mb: u32,

    /// Maximum number of entries; when non-zero it replaces the size limit
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            staging_dir: None,
            max_total_mb: 256,
            max_entries: 0,
        }
    }
}

impl CacheConfig {
    /// The ceiling this configuration describes
    pub fn ceiling(&self) -> Ceiling {
        if self.max_entries > 0 {
            Ceiling::Entries(self.max_entries)
        } else {
            Ceiling::Bytes(mb_to_bytes(self.max_total_mb))
        }
    }

    /// Resolve the cache root, falling back to `state_dir`
    pub fn dir_or(&self, state_dir: &Path) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| state_dir.join("cache"))
    }

    /// Resolve the staging directory, falling back to `state_dir`
    pub fn staging_dir_or(&self, state_dir: &Path) -> PathBuf {
        self.staging_dir
            .clone()
            .unwrap_or_else(|| state_dir.join("staging"))
    }
}
