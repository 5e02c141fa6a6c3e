use crate::config::types::TrmnlConfig;
use crate::errors::ConfigError;

/// Validate a loaded configuration.
pub fn validate_config(config: &TrmnlConfig) -> Result<(), ConfigError> {
    validate_url(config.api.url())?;

    if config.api.timeout_secs == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "api.timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.image.timeout_secs == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "image.timeout_secs must be greater than 0".to_string(),
        });
    }

    Ok(())
}

/// Reject anything that is not an absolute http(s) URL with a host.
pub fn validate_url(url: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidConfiguration {
        message: format!("api.url '{url}' is not usable: {reason}"),
    };

    let parsed = reqwest::Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(invalid(format!("unsupported scheme '{scheme}'")));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    Ok(())
}
