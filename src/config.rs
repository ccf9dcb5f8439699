//! Application configuration
//!
//! Read from an optional TOML file, by default
//! `~/.config/mnemo/config.toml`:
//! ```toml
//! deck_path = "/home/me/decks/rust.json"
//! state_path = "/home/me/.local/share/mnemo/state.json"
//!
//! [scheduler]
//! passing_threshold = 3
//! minimum_ease_factor = 1.3
//! ```
//! Every key is optional; command-line flags override the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::scheduler::SchedulerConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Deck file with card content
    pub deck_path: Option<PathBuf>,
    /// Schedule state file
    pub state_path: Option<PathBuf>,
    /// Scheduling parameters
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from the default location, or fall back to built-in defaults
    /// when no config file exists
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_config_path() {
            Some(path) if path.exists() => {
                log::debug!("Using config file {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Default config path: `~/.config/mnemo/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mnemo").join("config.toml"))
    }

    /// Default state path: `~/.local/share/mnemo/state.json`
    pub fn default_state_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("mnemo").join("state.json"))
    }
}
