use crate::errors::TrmnlError;

/// Everything that can go wrong in one refresh cycle.
///
/// Only `MissingToken` stops polling; every other variant is absorbed by the
/// controller and followed by a rescheduled refresh.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RefreshError {
    #[error("Enter an access token to load the screen.")]
    MissingToken,

    /// Non-integral codes are reported as sent (`API error: 200.5`).
    #[error("API error: {status}")]
    ApiStatus { status: f64 },

    #[error("API response missing image_url.")]
    MissingImageUrl,

    #[error("image fetch HTTP {status}")]
    ImageHttp { status: u16 },

    #[error("{message}")]
    Network { message: String },
}

impl TrmnlError for RefreshError {
    fn error_code(&self) -> &'static str {
        match self {
            RefreshError::MissingToken => "MISSING_TOKEN",
            RefreshError::ApiStatus { .. } => "API_STATUS_ERROR",
            RefreshError::MissingImageUrl => "MISSING_IMAGE_URL",
            RefreshError::ImageHttp { .. } => "IMAGE_HTTP_ERROR",
            RefreshError::Network { .. } => "NETWORK_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, RefreshError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_message() {
        let error = RefreshError::MissingToken;
        assert_eq!(
            error.to_string(),
            "Enter an access token to load the screen."
        );
        assert_eq!(error.error_code(), "MISSING_TOKEN");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_api_status_message_contains_code() {
        let error = RefreshError::ApiStatus { status: 503.0 };
        assert_eq!(error.to_string(), "API error: 503");
        assert_eq!(error.error_code(), "API_STATUS_ERROR");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_fractional_api_status_is_shown_as_sent() {
        let error = RefreshError::ApiStatus { status: 200.5 };
        assert_eq!(error.to_string(), "API error: 200.5");
    }

    #[test]
    fn test_image_http_message_contains_code() {
        let error = RefreshError::ImageHttp { status: 404 };
        assert_eq!(error.to_string(), "image fetch HTTP 404");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_network_message_passes_through() {
        let error = RefreshError::Network {
            message: "operation timed out".to_string(),
        };
        assert_eq!(error.to_string(), "operation timed out");
        assert_eq!(error.error_code(), "NETWORK_ERROR");
    }
}
