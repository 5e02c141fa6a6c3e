use crate::errors::TrmnlError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Screen service is not running")]
    Stopped,
}

impl TrmnlError for ServiceError {
    fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Stopped => "SERVICE_STOPPED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_stopped() {
        let error = ServiceError::Stopped;
        assert_eq!(error.to_string(), "Screen service is not running");
        assert_eq!(error.error_code(), "SERVICE_STOPPED");
        assert!(!error.is_user_error());
    }
}
