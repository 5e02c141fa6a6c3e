//! Configuration loading.
//!
//! Configuration is resolved in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.trmnl/config.toml`, or the file named by `TRMNL_CONFIG_FILE`
//! 3. **CLI arguments** - Command-line flags (highest priority, applied by the caller)

use crate::config::types::{Config, TrmnlConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// Load the user configuration and validate it.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed, or if
/// validation fails. A missing config file is not an error.
pub fn load_config() -> Result<TrmnlConfig, ConfigError> {
    let config = load_config_file(&config_file_path())?;
    validate_config(&config)?;
    Ok(config)
}

/// Load a configuration file, returning defaults when it does not exist.
pub fn load_config_file(path: &Path) -> Result<TrmnlConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                event = "core.config.file_missing",
                path = %path.display()
            );
            return Ok(TrmnlConfig::default());
        }
        Err(e) => return Err(ConfigError::IoError { source: e }),
    };

    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        message: format!("'{}': {}", path.display(), e),
    })
}

fn config_file_path() -> PathBuf {
    if let Ok(path_str) = std::env::var("TRMNL_CONFIG_FILE")
        && !path_str.is_empty()
    {
        return PathBuf::from(path_str);
    }
    Config::new().config_file()
}
