//! CSV sample log with daily rollover.
//!
//! Auto-named files follow the `HH.MM.SS dd.mm.YYYY.csv` convention; a row
//! carries the wall-clock time plus the sample values at two-decimal
//! resolution. Writing with no active log is recovered with a diagnostic —
//! the control loop is never interrupted by its log.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};
use thiserror::Error;
use tracing::warn;

use crate::sample::Sample;

pub type LogResult<T> = Result<T, LogError>;

#[derive(Debug, Error)]
pub enum LogError {
    /// `write` was called with no log started.
    #[error("no active log")]
    NotActive,

    #[error("log i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

struct ActiveLog {
    writer: csv::Writer<File>,
    date: NaiveDate,
    path: PathBuf,
}

/// Durable per-iteration sample log.
pub struct SampleLog {
    headers: Vec<String>,
    directory: PathBuf,
    file_name: Option<String>,
    active: Option<ActiveLog>,
}

impl SampleLog {
    /// # Arguments
    ///
    /// * `headers` - Column names after the automatic "Time" column
    /// * `directory` - Where log files are created
    /// * `file_name` - Fixed file name; timestamp-derived when `None`
    pub fn new(
        headers: Vec<String>,
        directory: impl Into<PathBuf>,
        file_name: Option<String>,
    ) -> Self {
        Self {
            headers,
            directory: directory.into(),
            file_name,
            active: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Path of the file currently being written.
    pub fn active_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|a| a.path.as_path())
    }

    /// Create the log file and write the header row.
    pub fn start(&mut self) -> LogResult<()> {
        self.start_at(Local::now())
    }

    pub fn start_at(&mut self, now: DateTime<Local>) -> LogResult<()> {
        std::fs::create_dir_all(&self.directory)?;
        let name = match &self.file_name {
            Some(name) => format!("{name}.csv"),
            None => format!("{}.csv", now.format("%H.%M.%S %d.%m.%Y")),
        };
        let path = self.directory.join(name);
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_path(&path)?;

        let mut header = vec!["Time".to_string()];
        header.extend(self.headers.iter().cloned());
        writer.write_record(&header)?;

        self.active = Some(ActiveLog {
            writer,
            date: now.date_naive(),
            path,
        });
        Ok(())
    }

    /// Append a timestamped row for the sample.
    pub fn write(&mut self, sample: &Sample) -> LogResult<()> {
        self.write_at(sample, Local::now())
    }

    pub fn write_at(&mut self, sample: &Sample, now: DateTime<Local>) -> LogResult<()> {
        if self.active.is_none() {
            warn!("sample dropped: no active log");
            return Err(LogError::NotActive);
        }

        // Daily rollover for auto-named logs; a fixed name keeps its file.
        let needs_rollover = self
            .active
            .as_ref()
            .map(|a| a.date != now.date_naive())
            .unwrap_or(false);
        if needs_rollover && self.file_name.is_none() {
            self.stop()?;
            self.start_at(now)?;
        }

        let active = self.active.as_mut().ok_or(LogError::NotActive)?;
        let mut record = vec![now.format("%H:%M:%S").to_string()];
        record.extend(sample.log_values().iter().map(|v| format!("{v:.2}")));
        active.writer.write_record(&record)?;
        Ok(())
    }

    /// Flush and close the current file. Idempotent.
    pub fn stop(&mut self) -> LogResult<()> {
        if let Some(mut active) = self.active.take() {
            active.writer.flush()?;
        }
        Ok(())
    }
}
