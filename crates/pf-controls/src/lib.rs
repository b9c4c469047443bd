//! Control algorithm primitives for pidflow.
//!
//! This crate owns the closed-loop control law: P/PI/PID output computation,
//! output limiting with anti-windup, and bumpless (seamless) transfer between
//! operating modes.
//!
//! # Architecture
//!
//! The controller is split into an immutable configuration ([`Controller`])
//! and a small mutable state ([`ControllerState`]) that persists across loop
//! iterations:
//! - The configuration is cheap to rebuild, so live re-tuning is done by
//!   compiling a fresh `Controller` from the settings snapshot each iteration
//! - The state carries only the integral accumulator, the derivative
//!   reference, and the last observed mode
//!
//! # Design Principles
//!
//! - **State-in, state-out**: `update` consumes a state reference and returns
//!   the successor state alongside the output; no hidden mutation
//! - **Bumpless transfer**: any mode change back-solves the integral
//!   accumulator so the output does not jump
//! - **Saturation-aware**: limiting is evaluated on the unclamped output
//!   before the accumulator update, so anti-windup sees the true violation

pub mod controller;
pub mod error;
pub mod mode;

pub use controller::{Controller, ControllerState};
pub use error::{ControlError, ControlResult};
pub use mode::{ControlMode, ControlType};
