//! User configuration loaded from `~/.config/zcalc/config.toml`.
//!
//! Every field has a default, so a missing file or a partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::calculator::{DEFAULT_PRECISION, DisplayOptions};
use crate::history::DEFAULT_MAX_ENTRIES;

const APP_DIR: &str = "zcalc";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub history: HistoryConfig,
    pub display: DisplayConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Persist history between sessions.
    pub enabled: bool,
    pub max_entries: usize,
    /// Override for the history file location.
    pub file: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: DEFAULT_MAX_ENTRIES,
            file: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Significant digits shown for results.
    pub precision: usize,
    pub thousands_separators: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            thousands_separators: false,
        }
    }
}

impl DisplayConfig {
    pub fn options(&self) -> DisplayOptions {
        DisplayOptions {
            precision: self.precision,
            thousands_separators: self.thousands_separators,
        }
    }
}

impl Config {
    /// Default location of the config file, if a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Load the config from `path`, or the default location when `None`.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            tracing::debug!("no config directory, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// The history file to use, or `None` when persistence is off.
    pub fn history_path(&self) -> Option<PathBuf> {
        if !self.history.enabled {
            return None;
        }
        self.history
            .file
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR).join("history.json")))
    }
}
