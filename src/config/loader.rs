//! Configuration loading from file system
//!
//! Reads `config.json` from the per-user config directory.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use super::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use super::types::HotkeysConfig;
use crate::error::{HotkeyError, Result, ResultExt};

/// `<config dir>/hotkeys/config.json`, or a relative `config.json` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// Read and parse `path`. A missing file yields the defaults.
pub fn try_load_config(path: &Path) -> Result<HotkeysConfig> {
    if !path.exists() {
        return Ok(HotkeysConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|source| HotkeyError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&content)?;
    Ok(config)
}

/// Load configuration from `path`.
///
/// Returns `HotkeysConfig::default()` if the file is missing or malformed.
#[instrument(name = "load_config", skip_all, fields(path = %path.display()))]
pub fn load_config(path: &Path) -> HotkeysConfig {
    if !path.exists() {
        info!("Config file not found, using defaults");
        return HotkeysConfig::default();
    }

    match try_load_config(path).warn_on_err() {
        Some(config) => {
            info!("Successfully loaded config");
            config
        }
        None => {
            warn!("Failed to load config, using defaults");
            HotkeysConfig::default()
        }
    }
}
