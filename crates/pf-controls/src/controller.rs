//! Controller configuration, state, and the compute algorithm.
//!
//! The controller includes:
//! - P, PI, and PID laws with derivative-on-PV
//! - Output clamping with fractional anti-windup accumulation
//! - Bumpless transfer on every mode change

use crate::error::{ControlError, ControlResult};
use crate::mode::{ControlMode, ControlType};
use pf_core::{Real, round2};
use serde::{Deserialize, Serialize};

/// Controller configuration.
///
/// Immutable per iteration; rebuilt from the settings snapshot when live
/// tuning changes a parameter. Validate with [`Controller::validate`] before
/// first use — `update` assumes a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    /// Operating mode.
    pub mode: ControlMode,
    /// Control law applied in `Auto` mode.
    pub ctrl_type: ControlType,
    /// Target value for the process variable. In `Manual` mode this slot
    /// carries the operator-set output instead (see crate docs).
    pub setpoint: Real,
    /// Proportional gain Kg (non-zero; also divides the transfer back-solve).
    pub gain: Real,
    /// Integral time Ki in process-engineering units. Required positive for
    /// PI and PID.
    pub integral_time: Real,
    /// Derivative time Kd. Used by PID only.
    pub derivative_time: Real,
    /// Loop period in seconds (must be positive).
    pub interval: Real,
    /// Whether output limiting (and with it anti-windup) is enforced.
    pub limits_active: bool,
    /// Lower output bound.
    pub output_low_limit: Real,
    /// Upper output bound.
    pub output_high_limit: Real,
    /// Fraction of the error accumulated while the output is saturated,
    /// typically in 0..1.
    pub anti_windup: Real,
}

impl Controller {
    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArg` if the interval is not positive, the gain is
    /// zero, the limits are inverted, or a tuning constant required by the
    /// selected control law is missing or non-positive.
    pub fn validate(&self) -> ControlResult<()> {
        if !(self.interval > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "interval must be positive",
            });
        }
        if self.gain == 0.0 || !self.gain.is_finite() {
            return Err(ControlError::InvalidArg {
                what: "gain must be finite and non-zero",
            });
        }
        if self.output_low_limit > self.output_high_limit {
            return Err(ControlError::InvalidArg {
                what: "output_low_limit must not exceed output_high_limit",
            });
        }
        match self.ctrl_type {
            ControlType::P => {}
            ControlType::Pi | ControlType::Pid => {
                if !(self.integral_time > 0.0) {
                    return Err(ControlError::InvalidArg {
                        what: "integral_time must be positive for PI and PID",
                    });
                }
                if self.ctrl_type == ControlType::Pid && !self.derivative_time.is_finite() {
                    return Err(ControlError::InvalidArg {
                        what: "derivative_time must be finite for PID",
                    });
                }
            }
        }
        Ok(())
    }

    /// Compute the next output from the current process variable and valve
    /// position.
    ///
    /// # Arguments
    ///
    /// * `state` - Controller state from the previous iteration
    /// * `pv` - Process variable (measured value)
    /// * `op` - Valve operating point currently applied in the field
    ///
    /// # Returns
    ///
    /// Updated state and the output, rounded to two decimal places in `Auto`
    /// mode. In `Manual` mode the configured setpoint slot is returned
    /// verbatim.
    pub fn update(
        &self,
        state: &ControllerState,
        pv: Real,
        op: Real,
    ) -> ControlResult<(ControllerState, Real)> {
        if !pv.is_finite() {
            return Err(ControlError::NonFinite {
                what: "process variable",
                value: pv,
            });
        }
        if !op.is_finite() {
            return Err(ControlError::NonFinite {
                what: "operating point",
                value: op,
            });
        }

        let mut next = state.clone();

        // Bumpless transfer on any mode change, including the very first
        // iteration (previous_mode starts out unset).
        if next.previous_mode != Some(self.mode) {
            next.accumulated_error = match self.ctrl_type {
                ControlType::P => 0.0,
                // Back-solve the integral that would have produced the
                // current OP given the present error, so resuming control
                // does not step the output.
                ControlType::Pi | ControlType::Pid => ((self.integral_time / self.interval)
                    * (op / self.gain - (self.setpoint - pv)))
                    .round(),
            };
            next.previous_pv = pv;
            next.previous_mode = Some(self.mode);
        }

        match self.mode {
            ControlMode::Manual => Ok((next, self.setpoint)),
            ControlMode::Auto => {
                let error = self.setpoint - pv;
                let raw = match self.ctrl_type {
                    ControlType::P => self.gain * error,
                    ControlType::Pi => self.gain * (error + self.integral_term(&next)),
                    ControlType::Pid => {
                        let derivative =
                            (next.previous_pv - pv) * self.derivative_time / self.interval;
                        let out = self.gain * (error + self.integral_term(&next) + derivative);
                        next.previous_pv = pv;
                        out
                    }
                };
                let limited = self.limit_output(&mut next, raw, error);
                Ok((next, round2(limited)))
            }
        }
    }

    fn integral_term(&self, state: &ControllerState) -> Real {
        state.accumulated_error * self.interval / self.integral_time
    }

    /// Enforce output limits and update the integral accumulator.
    ///
    /// Saturation is judged on the unclamped output, before the accumulator
    /// update: while saturated only `anti_windup * error` is accumulated.
    /// The clamp-then-partial-accumulate order is load-bearing for loop
    /// stability and must not be reordered.
    fn limit_output(&self, state: &mut ControllerState, raw: Real, error: Real) -> Real {
        if self.limits_active {
            if raw > self.output_high_limit {
                state.accumulated_error += self.anti_windup * error;
                return self.output_high_limit;
            }
            if raw < self.output_low_limit {
                state.accumulated_error += self.anti_windup * error;
                return self.output_low_limit;
            }
        }
        state.accumulated_error += error;
        raw
    }
}

/// Mutable controller state, persisted across loop iterations.
///
/// Created once at loop start and destroyed with the loop; nothing is
/// persisted across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    /// Integral accumulator. Reset only by bumpless-transfer recalculation.
    pub accumulated_error: Real,
    /// Last process variable, the derivative-on-PV reference.
    pub previous_pv: Real,
    /// Mode observed on the previous update. `None` until the first update,
    /// which forces transfer initialization.
    pub previous_mode: Option<ControlMode>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            accumulated_error: 0.0,
            previous_pv: 0.0,
            previous_mode: None,
        }
    }
}
