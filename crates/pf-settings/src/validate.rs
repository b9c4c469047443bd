//! Settings document validation.

use crate::compile::compile_settings;
use crate::schema::SettingsDoc;

/// Number of sample values a log row carries after the time column.
pub const LOG_COLUMNS: usize = 4;
/// Number of sample values the strip chart plots (PV, new OP, setpoint).
pub const PLOT_SERIES: usize = 3;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid control mode: {mode} (options are auto & manual)")]
    InvalidControlMode { mode: String },

    #[error("Invalid control type: {ctrl_type} (options are P, PI & PID)")]
    InvalidControlType { ctrl_type: String },

    #[error("Unsupported transport method: {method} (options are tcp & rtu)")]
    UnsupportedTransport { method: String },

    #[error("Missing tuning parameter: {what}")]
    MissingTuning { what: &'static str },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Controller configuration: {0}")]
    Controller(#[from] pf_controls::ControlError),
}

pub fn validate_settings(doc: &SettingsDoc) -> Result<(), ValidationError> {
    compile_settings(doc)?;

    if doc.logging.headers.len() != LOG_COLUMNS {
        return Err(ValidationError::InvalidValue {
            field: "logging.headers".to_string(),
            value: doc.logging.headers.len().to_string(),
            reason: format!("expected {LOG_COLUMNS} column names"),
        });
    }

    if doc.plot.pens.len() != PLOT_SERIES {
        return Err(ValidationError::InvalidValue {
            field: "plot.pens".to_string(),
            value: doc.plot.pens.len().to_string(),
            reason: format!("expected one pen per plotted series ({PLOT_SERIES})"),
        });
    }
    for (idx, pen) in doc.plot.pens.iter().enumerate() {
        if pen.plot == 0 {
            return Err(ValidationError::InvalidValue {
                field: format!("plot.pens[{idx}].plot"),
                value: "0".to_string(),
                reason: "subplot indices are 1-based".to_string(),
            });
        }
    }
    if doc.plot.x_axis_length == 0 {
        return Err(ValidationError::InvalidValue {
            field: "plot.x_axis_length".to_string(),
            value: "0".to_string(),
            reason: "the sliding window needs at least one sample".to_string(),
        });
    }
    if doc.plot.y_axis_min >= doc.plot.y_axis_max {
        return Err(ValidationError::InvalidValue {
            field: "plot.y_axis_min".to_string(),
            value: doc.plot.y_axis_min.to_string(),
            reason: "must be below y_axis_max".to_string(),
        });
    }

    Ok(())
}
