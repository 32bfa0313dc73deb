//! Configuration management for Hoard

pub mod schema;

pub use schema::Config;

use crate::cache::BoundedFileCache;
use crate::error::{HoardError, HoardResult};
use crate::records::{PermissionBook, PreferenceBook};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Locates, reads and writes `config.toml`
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for `~/.config/hoard/config.toml`
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Manager for a file given by `--config` or `HOARD_CONFIG`
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hoard")
            .join("config.toml")
    }

    /// Where record files and the cache live unless configured otherwise
    pub fn state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hoard")
    }

    /// Read the managed file; a missing file yields the defaults
    pub async fn load(&self) -> HoardResult<Config> {
        match self.load_from_file(&self.config_path).await {
            Err(e) if e.is_not_found() => {
                debug!(
                    "No config at {}, using defaults",
                    self.config_path.display()
                );
                Ok(Config::default())
            }
            loaded => loaded,
        }
    }

    /// Parse `path` as a hoard config
    pub async fn load_from_file(&self, path: &Path) -> HoardResult<Config> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            HoardError::io(format!("reading config from {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| HoardError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Write `config` to the managed file, creating its directory
    pub async fn save(&self, config: &Config) -> HoardResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| HoardError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let rendered = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, rendered).await.map_err(|e| {
            HoardError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Wrote config to {}", self.config_path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Path of the permission record file
    pub fn permissions_path(&self) -> PathBuf {
        self.store
            .data_dir_or(&ConfigManager::state_dir())
            .join(&self.store.permissions_file)
    }

    /// Path of the voice preference record file
    pub fn preferences_path(&self) -> PathBuf {
        self.store
            .data_dir_or(&ConfigManager::state_dir())
            .join(&self.store.preferences_file)
    }

    /// Open the permission book this configuration points at
    pub fn open_permissions(&self) -> PermissionBook {
        PermissionBook::open(self.permissions_path(), self.store.max_file_bytes)
    }

    /// Open the preference book this configuration points at
    pub fn open_preferences(&self) -> PreferenceBook {
        PreferenceBook::open(self.preferences_path(), self.store.max_file_bytes)
    }

    /// Open the artifact cache, creating its directories
    pub fn open_cache(&self) -> HoardResult<BoundedFileCache> {
        let state_dir = ConfigManager::state_dir();
        BoundedFileCache::new(
            self.cache.dir_or(&state_dir),
            self.cache.staging_dir_or(&state_dir),
            self.cache.ceiling(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().await.unwrap();
        assert_eq!(config.general.log_format, "text");
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.cache.max_total_mb = 12;

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.cache.max_total_mb, 12);
    }

    #[tokio::test]
    async fn invalid_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        tokio::fs::write(&path, "[cache\nmax_total_mb = ").await.unwrap();

        let err = ConfigManager::with_path(path.clone()).load().await.unwrap_err();
        assert!(matches!(err, HoardError::ConfigInvalid { path: p, .. } if p == path));
    }

    #[test]
    fn configured_dirs_are_used() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.store.data_dir = Some(temp.path().join("data"));
        config.cache.dir = Some(temp.path().join("cache"));
        config.cache.staging_dir = Some(temp.path().join("staging"));

        assert_eq!(
            config.permissions_path(),
            temp.path().join("data").join("permissions.json")
        );
        let cache = config.open_cache().unwrap();
        assert!(cache.root().is_dir());
        assert!(cache.staging_dir().is_dir());
    }
}
