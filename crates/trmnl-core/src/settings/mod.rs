//! Persisted user settings (access token and refresh rate).
//!
//! Stored as JSON at `~/.trmnl/settings.json`, overridable with
//! `TRMNL_SETTINGS_FILE`.

pub mod errors;
pub mod persistence;

use serde::{Deserialize, Serialize};

pub use errors::SettingsError;
pub use persistence::SettingsFile;

/// Refresh rate used when nothing usable is stored or reported.
pub const DEFAULT_REFRESH_RATE_SECONDS: u64 = 1800;

/// Lower bound for any refresh rate that is stored or scheduled.
pub const MIN_REFRESH_RATE_SECONDS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_refresh_rate_seconds")]
    pub refresh_rate_seconds: u64,
}

fn default_refresh_rate_seconds() -> u64 {
    DEFAULT_REFRESH_RATE_SECONDS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            refresh_rate_seconds: DEFAULT_REFRESH_RATE_SECONDS,
        }
    }
}

impl Settings {
    /// Trim the token and bring the refresh rate into range.
    ///
    /// A stored rate of zero is treated as unset.
    pub fn normalized(self) -> Self {
        let refresh_rate_seconds = match self.refresh_rate_seconds {
            0 => DEFAULT_REFRESH_RATE_SECONDS,
            rate => rate.max(MIN_REFRESH_RATE_SECONDS),
        };
        Self {
            access_token: self.access_token.trim().to_string(),
            refresh_rate_seconds,
        }
    }
}
