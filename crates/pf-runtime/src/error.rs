//! Error types for the loop runtime.

use thiserror::Error;

use crate::logsink::LogError;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Faults that end (or fail to start) the control loop.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// `run()` was called before `start()` connected the loop.
    #[error("control loop is not connected; call start() first")]
    NotConnected,

    #[error("settings fault: {0}")]
    Settings(#[from] pf_settings::SettingsError),

    #[error("controller fault: {0}")]
    Control(#[from] pf_controls::ControlError),

    #[error("transport fault: {0}")]
    Link(#[from] pf_modbus::LinkError),

    #[error("log fault: {0}")]
    Log(#[from] LogError),
}
