//! Client configuration, read from `<config dir>/equipdesk/config.json`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Settings for the client. Missing keys fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Server root; the equipment collection lives at `<base_url>/equipment`.
    pub base_url: String,
    /// `tracing` filter directive, e.g. `info` or `equipdesk=debug`.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the platform config directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_path()?)
    }

    /// Loads the config at `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

/// `~/.config/equipdesk/config.json` on Linux.
pub fn default_path() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(dir.join("equipdesk").join("config.json"))
}
