//! Error types for the pf-app service layer.

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for the front-ends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Loop error: {0}")]
    Loop(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pf-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<pf_settings::SettingsError> for AppError {
    fn from(err: pf_settings::SettingsError) -> Self {
        AppError::Settings(err.to_string())
    }
}

impl From<pf_settings::ValidationError> for AppError {
    fn from(err: pf_settings::ValidationError) -> Self {
        AppError::Settings(err.to_string())
    }
}

impl From<pf_modbus::LinkError> for AppError {
    fn from(err: pf_modbus::LinkError) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<pf_runtime::RuntimeError> for AppError {
    fn from(err: pf_runtime::RuntimeError) -> Self {
        match err {
            pf_runtime::RuntimeError::Link(link) => AppError::Transport(link.to_string()),
            other => AppError::Loop(other.to_string()),
        }
    }
}
