//! TOML configuration for the Mindscan CLI.
//!
//! Every section is optional; a missing file means all defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use mindscan_core::credentials::PasswordScheme;
use mindscan_core::storage::DEFAULT_WINDOW_DAYS;
use mindscan_core::StoreOptions;
use serde::{Deserialize, Serialize};

use crate::constants::CONFIG_ENV;

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MindscanConfig {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub security: SecuritySection,
    #[serde(default)]
    pub trends: TrendsSection,
    #[serde(default)]
    pub classifiers: ClassifiersSection,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub path: Option<String>,
    pub busy_timeout_ms: u64,
    pub migration_timeout_secs: Option<u64>,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            migration_timeout_secs: None,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub password_scheme: PasswordScheme,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendsSection {
    pub default_days: u32,
}

impl Default for TrendsSection {
    fn default() -> Self {
        Self {
            default_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// External classifier programs.
///
/// Each is an argv list. The program receives the input on stdin and must
/// print `{"sentiment": <float>, "emotion": <string|null>}` on stdout.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifiersSection {
    pub text_command: Option<Vec<String>>,
    pub image_command: Option<Vec<String>>,
}

impl MindscanConfig {
    /// Store tunables derived from this config.
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            busy_timeout: Duration::from_millis(self.storage.busy_timeout_ms),
            migration_timeout: self
                .storage
                .migration_timeout_secs
                .map(Duration::from_secs),
            password_scheme: self.security.password_scheme,
        }
    }
}

/// Resolve the config file path, checking MINDSCAN_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_db_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("mindscan.db"))
}

/// Read the config at `path`, or defaults if the file does not exist.
pub fn load_config(path: &Path) -> anyhow::Result<MindscanConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(MindscanConfig::default());
    }
    read_config(path)
}

pub fn read_config(path: &Path) -> anyhow::Result<MindscanConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("mindscan"));
        }
    }
    Ok(home_dir()?.join(".config").join("mindscan"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("mindscan"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("mindscan"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
