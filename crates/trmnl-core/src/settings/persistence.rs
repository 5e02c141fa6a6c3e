use std::path::{Path, PathBuf};

use super::Settings;
use super::errors::SettingsError;
use crate::config::Config;

/// Handle to the settings JSON file.
///
/// Every write is a read-modify-write upsert of a single key; there is no
/// grouping of writes.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `TRMNL_SETTINGS_FILE` if set, otherwise `~/.trmnl/settings.json`.
    pub fn default_location() -> Self {
        Self::new(settings_file_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings from disk.
    ///
    /// Returns defaults if the file doesn't exist or is corrupted (with error logged).
    pub fn load(&self) -> Settings {
        let path = &self.path;
        if !path.exists() {
            return Settings::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Settings>(&content) {
                Ok(settings) => settings.normalized(),
                Err(e) => {
                    tracing::error!(
                        event = "core.settings.json_parse_failed",
                        path = %path.display(),
                        error = %e,
                        "Settings file exists but contains invalid JSON - using defaults"
                    );
                    Settings::default()
                }
            },
            Err(e) => {
                tracing::error!(
                    event = "core.settings.load_failed",
                    path = %path.display(),
                    error = %e
                );
                Settings::default()
            }
        }
    }

    /// Write the full settings document.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let path = &self.path;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::SaveFailed {
                message: format!("Failed to create directory ({}): {}", parent.display(), e),
            })?;
        }

        let json = serde_json::to_string_pretty(&settings.clone().normalized()).map_err(|e| {
            SettingsError::SaveFailed {
                message: format!("Failed to serialize settings: {}", e),
            }
        })?;

        std::fs::write(path, json).map_err(|e| SettingsError::SaveFailed {
            message: format!("Failed to write settings file ({}): {}", path.display(), e),
        })?;

        tracing::debug!(event = "core.settings.saved", path = %path.display());

        Ok(())
    }

    pub fn set_access_token(&self, token: &str) -> Result<(), SettingsError> {
        let mut settings = self.load();
        settings.access_token = token.trim().to_string();
        self.save(&settings)
    }

    pub fn set_refresh_rate_seconds(&self, seconds: u64) -> Result<(), SettingsError> {
        let mut settings = self.load();
        settings.refresh_rate_seconds = seconds;
        self.save(&settings)
    }
}

fn settings_file_path() -> PathBuf {
    // Allow override via env var for testing.
    if let Ok(path_str) = std::env::var("TRMNL_SETTINGS_FILE")
        && !path_str.is_empty()
    {
        return PathBuf::from(path_str);
    }
    Config::new().settings_file()
}
