use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::{DEFAULT_REFRESH_RATE_SECONDS, MIN_REFRESH_RATE_SECONDS, Settings};

pub const STATUS_WAITING: &str = "Waiting…";
pub const STATUS_REFRESHING: &str = "Refreshing…";
pub const STATUS_UP_TO_DATE: &str = "Up to date.";

/// Everything an observer needs to render the current screen.
///
/// Serializes with camelCase keys so it can be handed to a UI layer as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenState {
    /// Trimmed; empty means unconfigured.
    pub access_token: String,
    /// Effective rate used to arm the next timer. Always >= 5.
    pub refresh_rate_seconds: u64,
    pub image_url: String,
    /// `data:<mime>;base64,...`, empty until an image fetch succeeds.
    pub image_data_url: String,
    pub last_fetched_at: Option<DateTime<Utc>>,
    pub status_text: String,
    pub is_loading: bool,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            refresh_rate_seconds: DEFAULT_REFRESH_RATE_SECONDS,
            image_url: String::new(),
            image_data_url: String::new(),
            last_fetched_at: None,
            status_text: STATUS_WAITING.to_string(),
            is_loading: false,
        }
    }
}

impl ScreenState {
    /// Initial state seeded from persisted settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let settings = settings.clone().normalized();
        Self {
            access_token: settings.access_token,
            refresh_rate_seconds: settings.refresh_rate_seconds,
            ..Default::default()
        }
    }

    pub fn has_token(&self) -> bool {
        !self.access_token.trim().is_empty()
    }
}

/// Parsed form of the current screen API response.
///
/// Fields are `None` when absent or of the wrong type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenDescriptor {
    pub status: Option<f64>,
    pub image_url: Option<String>,
    pub refresh_rate_seconds: Option<f64>,
}

impl ScreenDescriptor {
    /// Descriptor status if present, otherwise the transport status.
    pub fn effective_status(&self, http_status: u16) -> f64 {
        self.status.unwrap_or(f64::from(http_status))
    }

    /// The reported refresh rate, falling back to 1800 when absent and
    /// clamped to >= 5. A reported 0 therefore polls every 5 seconds.
    ///
    /// Fractional rates round up to whole seconds.
    pub fn effective_refresh_rate(&self) -> u64 {
        let rate = self
            .refresh_rate_seconds
            .filter(|rate| rate.is_finite())
            .map(|rate| rate.ceil().max(0.0) as u64)
            .unwrap_or(DEFAULT_REFRESH_RATE_SECONDS);
        rate.max(MIN_REFRESH_RATE_SECONDS)
    }

    /// The image URL, treating an empty string as missing.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = ScreenState::default();
        assert_eq!(state.status_text, "Waiting…");
        assert_eq!(state.refresh_rate_seconds, 1800);
        assert!(!state.is_loading);
        assert!(state.last_fetched_at.is_none());
        assert!(!state.has_token());
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let json = serde_json::to_value(ScreenState::default()).unwrap();
        for key in [
            "accessToken",
            "refreshRateSeconds",
            "imageUrl",
            "imageDataUrl",
            "lastFetchedAt",
            "statusText",
            "isLoading",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        assert!(json["lastFetchedAt"].is_null());
    }

    #[test]
    fn test_from_settings_clamps_rate() {
        let state = ScreenState::from_settings(&Settings {
            access_token: " tok ".to_string(),
            refresh_rate_seconds: 3,
        });
        assert_eq!(state.access_token, "tok");
        assert_eq!(state.refresh_rate_seconds, 5);
    }

    #[test]
    fn test_effective_status_prefers_descriptor() {
        let descriptor = ScreenDescriptor {
            status: Some(500.0),
            ..Default::default()
        };
        assert_eq!(descriptor.effective_status(200), 500.0);
        assert_eq!(ScreenDescriptor::default().effective_status(404), 404.0);
    }

    #[test]
    fn test_effective_refresh_rate() {
        let with_rate = |rate: Option<f64>| ScreenDescriptor {
            refresh_rate_seconds: rate,
            ..Default::default()
        };
        assert_eq!(with_rate(None).effective_refresh_rate(), 1800);
        assert_eq!(with_rate(Some(0.0)).effective_refresh_rate(), 5);
        assert_eq!(with_rate(Some(900.0)).effective_refresh_rate(), 900);
        assert_eq!(with_rate(Some(2.0)).effective_refresh_rate(), 5);
        assert_eq!(with_rate(Some(-30.0)).effective_refresh_rate(), 5);
        assert_eq!(with_rate(Some(60.2)).effective_refresh_rate(), 61);
    }

    #[test]
    fn test_empty_image_url_counts_as_missing() {
        let descriptor = ScreenDescriptor {
            image_url: Some(String::new()),
            ..Default::default()
        };
        assert!(descriptor.image_url().is_none());
    }
}
