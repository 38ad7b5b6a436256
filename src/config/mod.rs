// Configuration module
// Startup values read from config.toml in the platform config directory

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
#[cfg(not(debug_assertions))]
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Countdown loaded into the timer at startup, in seconds.
    pub initial_countdown_secs: u64,
    /// Initial text of the "Preset Timer" field.
    pub preset_time: String,
    /// Initial text of the "Start Countdown" clock field.
    pub clock_time: String,
    /// Overrides the preference database location.
    pub database_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_countdown_secs: 300,
            preset_time: "00:05:00".to_string(),
            clock_time: "10:00".to_string(),
            database_path: None,
        }
    }
}

impl AppConfig {
    /// Parses the config at `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Loads the platform config file, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        let Some(path) = config_file_path() else {
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Using configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{:#}; using default configuration", e);
                Self::default()
            }
        }
    }

    /// Where the SQLite preference database lives.
    pub fn resolve_database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }
        default_database_path()
    }
}

fn config_file_path() -> Option<PathBuf> {
    #[cfg(debug_assertions)]
    {
        Some(PathBuf::from(CONFIG_FILE_NAME))
    }

    #[cfg(not(debug_assertions))]
    {
        ProjectDirs::from("de", "JoelSteffens", "CountdownOverlay")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

fn default_database_path() -> Result<PathBuf> {
    #[cfg(debug_assertions)]
    {
        Ok(PathBuf::from("countdown_prefs.db"))
    }

    #[cfg(not(debug_assertions))]
    {
        match ProjectDirs::from("de", "JoelSteffens", "CountdownOverlay") {
            Some(dirs) => {
                let data_dir = dirs.data_dir();
                fs::create_dir_all(data_dir).with_context(|| {
                    format!("Failed to create data directory {}", data_dir.display())
                })?;
                Ok(data_dir.join("preferences.db"))
            }
            None => Ok(PathBuf::from("countdown_prefs.db")),
        }
    }
}
