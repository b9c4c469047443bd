//! pf-settings: canonical settings document format, validation, and the
//! live-tuning provider.

pub mod compile;
pub mod provider;
pub mod schema;
pub mod validate;

pub use compile::{
    CompiledSettings, FaultPolicy, IoMap, RegisterAddress, compile_controller, compile_fault_policy,
    compile_io_map, compile_link, compile_settings,
};
pub use provider::{ControlSnapshot, FileSettings, SettingsProvider, StaticSettings};
pub use schema::*;
pub use validate::{ValidationError, validate_settings};

pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> SettingsResult<SettingsDoc> {
    let content = std::fs::read_to_string(path)?;
    let doc: SettingsDoc = serde_yaml::from_str(&content)?;
    validate_settings(&doc)?;
    Ok(doc)
}

pub fn save_yaml(path: &std::path::Path, doc: &SettingsDoc) -> SettingsResult<()> {
    validate_settings(doc)?;
    let content = serde_yaml::to_string(doc)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> SettingsResult<SettingsDoc> {
    let content = std::fs::read_to_string(path)?;
    let doc: SettingsDoc = serde_json::from_str(&content)?;
    validate_settings(&doc)?;
    Ok(doc)
}

pub fn save_json(path: &std::path::Path, doc: &SettingsDoc) -> SettingsResult<()> {
    validate_settings(doc)?;
    let content = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, content)?;
    Ok(())
}
