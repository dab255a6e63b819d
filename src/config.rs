//! Configuration loading and management
//!
//! Handles parsing of `config.toml` in the data directory and resolving the
//! data directory itself.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;

/// Config file name inside the data directory
pub const CONFIG_FILE: &str = "config.toml";

/// Upper bound for `store.lock_timeout_ms`
const MAX_LOCK_TIMEOUT_MS: u64 = 60_000;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Store-related configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store file, relative to the data directory unless absolute
    #[serde(default = "default_store_file")]
    pub file: PathBuf,

    /// How long to wait for the store lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_store_file() -> PathBuf {
    PathBuf::from("store.json")
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            file: default_store_file(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

/// Display-related configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Leave completed lists out of the overview
    #[serde(default = "default_true")]
    pub hide_completed_lists: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            hide_completed_lists: true,
        }
    }
}

impl StoreConfig {
    fn validate(&self) -> Result<()> {
        if self.file.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "store.file cannot be empty".to_string(),
            ));
        }
        if self.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "store.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        if self.lock_timeout_ms > MAX_LOCK_TIMEOUT_MS {
            return Err(Error::InvalidConfig(format!(
                "store.lock_timeout_ms must be <= {MAX_LOCK_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or return defaults when it does not exist
    ///
    /// Unlike a missing file, an unreadable or invalid one is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Absolute path of the store file for a data directory
    pub fn store_path(&self, data_dir: &Path) -> PathBuf {
        if self.store.file.is_absolute() {
            self.store.file.clone()
        } else {
            data_dir.join(&self.store.file)
        }
    }

    fn validate(&self) -> Result<()> {
        self.store.validate()
    }
}

/// Resolve the data directory: explicit path first, then the platform default.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    ProjectDirs::from("", "", "checkoff")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            Error::InvalidConfig(
                "no home directory found; pass --data-dir or set CHECKOFF_DIR".to_string(),
            )
        })
}
