//! # Configuration System
//!
//! TOML configuration for the screen API endpoint and HTTP limits.
//!
//! ```toml
//! # ~/.trmnl/config.toml
//! [api]
//! url = "https://usetrmnl.com/api/current_screen"
//!
//! [image]
//! max_redirects = 5
//! ```
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use trmnl_core::config::TrmnlConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TrmnlConfig::load()?;
//!     println!("polling {}", config.api.url());
//!     Ok(())
//! }
//! ```
//!
//! User preferences that change at runtime (access token, refresh rate)
//! live in [`crate::settings`], not here.

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use defaults::{DEFAULT_API_URL, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS};
pub use types::{ApiConfig, Config, ImageConfig, TrmnlConfig};
pub use validation::validate_config;

impl TrmnlConfig {
    /// Load the user configuration.
    ///
    /// See [`loading::load_config`] for details.
    pub fn load() -> Result<Self, crate::errors::ConfigError> {
        loading::load_config()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
