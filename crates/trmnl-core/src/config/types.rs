//! Configuration type definitions for trmnl.
//!
//! These types are deserialized from the TOML config file.
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! url = "https://usetrmnl.com/api/current_screen"
//! timeout_secs = 15
//!
//! [image]
//! timeout_secs = 15
//! max_redirects = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime paths derived from environment variables and system defaults,
/// not from config files.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for all trmnl data (default: ~/.trmnl)
    pub trmnl_dir: PathBuf,
}

/// Main configuration loaded from `~/.trmnl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TrmnlConfig {
    /// Screen API endpoint settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Image download settings
    #[serde(default)]
    pub image: ImageConfig,
}

/// Screen API endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiConfig {
    /// Current screen endpoint.
    /// Default: https://usetrmnl.com/api/current_screen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Request timeout in seconds.
    /// Default: 15 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Image download configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ImageConfig {
    /// Request timeout in seconds.
    /// Default: 15 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Maximum number of redirects followed for the image URL.
    /// Default: 10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_redirects: Option<usize>,
}
