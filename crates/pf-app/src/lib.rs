//! pf-app: service layer shared by the CLI and the scope front-end.

pub mod error;
pub mod loop_service;

pub use error::{AppError, AppResult};
pub use loop_service::{run_headless, run_with_sinks, validate_settings_file};
