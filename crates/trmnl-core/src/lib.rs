//! trmnl-core: polling client for a TRMNL "current screen"
//!
//! Fetches the screen description from the TRMNL API, downloads the image it
//! points at, and keeps one shared [`ScreenState`] current for any number of
//! observers. Used by the CLI; a desktop UI would consume the same
//! [`ScreenHandle`].
//!
//! # Main Entry Points
//!
//! - [`service`] - Run the refresh loop and control it through a handle
//! - [`screen`] - Parser, image fetcher, scheduler, state store, controller
//! - [`settings`] - Persisted access token and refresh rate
//! - [`config`] - Endpoint and HTTP configuration

pub mod config;
pub mod errors;
pub mod logging;
pub mod screen;
pub mod service;
pub mod settings;
pub mod transport;

// Re-export commonly used types at crate root for convenience
pub use config::TrmnlConfig;
pub use errors::{ConfigError, TrmnlError};
pub use screen::{RefreshError, ScreenState, StateStore};
pub use service::{Ack, ScreenHandle, ScreenService, ServiceError};
pub use settings::{Settings, SettingsError, SettingsFile};

pub use logging::init_logging;
