//! Error types for control computations.

use thiserror::Error;

/// Result type for control computations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur while configuring or running the controller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid tuning or limit parameter.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A process input was NaN or infinite.
    #[error("Non-finite input for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}
