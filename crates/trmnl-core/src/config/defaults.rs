//! Default values for configuration types.

use crate::config::types::{ApiConfig, Config, ImageConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Current screen endpoint used when the config does not name one.
pub const DEFAULT_API_URL: &str = "https://usetrmnl.com/api/current_screen";

/// Per-request timeout for both the API and the image download.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Redirects followed when downloading the screen image.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

impl Default for Config {
    fn default() -> Self {
        let trmnl_dir = match dirs::home_dir() {
            Some(home) => home.join(".trmnl"),
            None => {
                tracing::warn!(
                    event = "core.config.home_dir_not_found",
                    "Could not find home directory, using temp directory"
                );
                std::env::temp_dir().join(".trmnl")
            }
        };

        Self { trmnl_dir }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config_file(&self) -> PathBuf {
        self.trmnl_dir.join("config.toml")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.trmnl_dir.join("settings.json")
    }
}

impl ApiConfig {
    /// Returns the API URL, defaulting to the public TRMNL endpoint.
    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Returns the request timeout, defaulting to 15 seconds.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

impl ImageConfig {
    /// Returns the request timeout, defaulting to 15 seconds.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Returns the redirect limit, defaulting to 10.
    pub fn max_redirects(&self) -> usize {
        self.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::TrmnlConfig;

    #[test]
    fn test_config_default_dir() {
        let config = Config::new();
        assert!(config.trmnl_dir.to_string_lossy().contains(".trmnl"));
        assert!(config.settings_file().ends_with("settings.json"));
        assert!(config.config_file().ends_with("config.toml"));
    }

    #[test]
    fn test_trmnl_config_defaults() {
        let config = TrmnlConfig::default();
        assert_eq!(config.api.url(), DEFAULT_API_URL);
        assert_eq!(config.api.timeout(), Duration::from_secs(15));
        assert_eq!(config.image.timeout(), Duration::from_secs(15));
        assert_eq!(config.image.max_redirects(), 10);
    }

    #[test]
    fn test_explicit_values_win() {
        let config = ImageConfig {
            timeout_secs: Some(3),
            max_redirects: Some(0),
        };
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.max_redirects(), 0);
    }
}
