use crate::errors::TrmnlError;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to save settings: {message}")]
    SaveFailed { message: String },
}

impl TrmnlError for SettingsError {
    fn error_code(&self) -> &'static str {
        match self {
            SettingsError::SaveFailed { .. } => "SETTINGS_SAVE_FAILED",
        }
    }
}
