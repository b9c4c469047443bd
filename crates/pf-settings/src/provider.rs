//! Live-tuning settings provider.
//!
//! The loop asks for a fresh controller snapshot every iteration instead of
//! holding a mutable global; re-reading the document each call is what makes
//! on-line re-tuning work.

use std::path::PathBuf;

use pf_controls::Controller;
use tracing::warn;

use crate::compile::{FaultPolicy, compile_settings};
use crate::{SettingsResult, load_yaml};

/// One iteration's immutable view of the controller settings.
#[derive(Debug, Clone)]
pub struct ControlSnapshot {
    pub controller: Controller,
    pub fault_policy: FaultPolicy,
}

/// Source of per-iteration controller snapshots.
pub trait SettingsProvider {
    fn control(&mut self) -> SettingsResult<ControlSnapshot>;
}

/// Re-reads the settings document from disk on every call.
///
/// The first read must succeed; afterwards a failed re-read or a document
/// that no longer validates keeps the loop on the last good snapshot, with
/// a diagnostic. A half-edited file must not take the loop down.
pub struct FileSettings {
    path: PathBuf,
    last_good: Option<ControlSnapshot>,
}

impl FileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_good: None,
        }
    }

    fn reload(&mut self) -> SettingsResult<ControlSnapshot> {
        let doc = load_yaml(&self.path)?;
        let compiled = compile_settings(&doc).map_err(crate::SettingsError::Validation)?;
        let snapshot = ControlSnapshot {
            controller: compiled.controller,
            fault_policy: compiled.fault_policy,
        };
        self.last_good = Some(snapshot.clone());
        Ok(snapshot)
    }
}

impl SettingsProvider for FileSettings {
    fn control(&mut self) -> SettingsResult<ControlSnapshot> {
        match self.reload() {
            Ok(snapshot) => Ok(snapshot),
            Err(err) => match &self.last_good {
                Some(snapshot) => {
                    warn!(path = %self.path.display(), %err, "settings re-read failed, keeping last good snapshot");
                    Ok(snapshot.clone())
                }
                None => Err(err),
            },
        }
    }
}

/// Fixed snapshot, for tests and one-shot runs.
pub struct StaticSettings(pub ControlSnapshot);

impl SettingsProvider for StaticSettings {
    fn control(&mut self) -> SettingsResult<ControlSnapshot> {
        Ok(self.0.clone())
    }
}
