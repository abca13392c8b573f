//! Settings persistence for the filter configuration.
//!
//! Stores settings in JSON format at `~/.portmon.json`. The on-disk shape is
//! a single object with a comma-separated `ports` string:
//!
//! ```json
//! { "ports": "4200,8080,8765,2910" }
//! ```
//!
//! The listening-only toggle is a session setting and is not persisted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::domain::FilterConfig;
use crate::error::{Error, Result};

/// Settings data stored in JSON format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Comma-separated list of port numbers.
    #[serde(default = "default_ports")]
    pub ports: String,
}

fn default_ports() -> String {
    FilterConfig::default().port_list()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ports: default_ports(),
        }
    }
}

impl Settings {
    /// The filter configuration these settings describe.
    ///
    /// Listening-only always starts enabled; it is not part of the file.
    pub fn to_filter(&self) -> FilterConfig {
        FilterConfig::from_port_list(&self.ports, true)
    }
}

impl From<&FilterConfig> for Settings {
    fn from(filter: &FilterConfig) -> Self {
        Self {
            ports: filter.port_list(),
        }
    }
}

/// Settings store for the per-user settings file.
///
/// Load failures of any kind fall back to the default filter; they are
/// logged, never surfaced. Saves are expected to be fire-and-forget from the
/// caller's point of view.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    /// Path to the settings file.
    settings_path: PathBuf,
}

impl SettingsStore {
    /// Create a store with the default path `~/.portmon.json`.
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

        Ok(Self {
            settings_path: home.join(".portmon.json"),
        })
    }

    /// Create a store with a custom path (for testing).
    pub fn with_path(settings_path: PathBuf) -> Self {
        Self { settings_path }
    }

    /// Get the settings file path.
    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    /// Load the filter configuration from disk.
    ///
    /// A missing or malformed file falls back to the default configuration.
    pub async fn load(&self) -> FilterConfig {
        match self.read_settings().await {
            Ok(Some(settings)) => settings.to_filter(),
            Ok(None) => FilterConfig::default(),
            Err(err) => {
                warn!(error = %err, path = %self.settings_path.display(),
                      "failed to read settings, using defaults");
                FilterConfig::default()
            }
        }
    }

    /// Load the filter configuration, writing the defaults back to disk when
    /// the file does not exist yet.
    pub async fn load_or_init(&self) -> FilterConfig {
        if !self.settings_path.exists() {
            let filter = FilterConfig::default();
            if let Err(err) = self.save(&filter).await {
                warn!(error = %err, "failed to write default settings");
            }
            return filter;
        }
        self.load().await
    }

    async fn read_settings(&self) -> Result<Option<Settings>> {
        if !self.settings_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.settings_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to read settings: {}", e)))?;

        let settings = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse settings: {}", e)))?;

        Ok(Some(settings))
    }

    /// Save the filter configuration to disk.
    ///
    /// Writes atomically by writing to a temp file then renaming.
    pub async fn save(&self, filter: &FilterConfig) -> Result<()> {
        let settings = Settings::from(filter);
        let content = serde_json::to_string_pretty(&settings)
            .map_err(|e| Error::Config(format!("Failed to serialize settings: {}", e)))?;

        let temp_path = self.settings_path.with_extension("json.tmp");

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to create temp settings file: {}", e)))?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| Error::Config(format!("Failed to write settings: {}", e)))?;

        file.sync_all()
            .await
            .map_err(|e| Error::Config(format!("Failed to sync settings: {}", e)))?;

        fs::rename(&temp_path, &self.settings_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to rename settings file: {}", e)))?;

        Ok(())
    }
}
