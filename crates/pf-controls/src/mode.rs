//! Operating mode and control law selection.

use serde::{Deserialize, Serialize};

/// Controller operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    /// Closed loop: the output is computed from the process variable.
    Auto,
    /// Open loop: the operator-set value is passed through as the output.
    Manual,
}

/// Control law applied in `Auto` mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlType {
    /// Proportional only.
    P,
    /// Proportional-integral.
    Pi,
    /// Proportional-integral-derivative (derivative on PV).
    Pid,
}

impl std::fmt::Display for ControlMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlMode::Auto => write!(f, "auto"),
            ControlMode::Manual => write!(f, "manual"),
        }
    }
}

impl std::fmt::Display for ControlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlType::P => write!(f, "P"),
            ControlType::Pi => write!(f, "PI"),
            ControlType::Pid => write!(f, "PID"),
        }
    }
}
