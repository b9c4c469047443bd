//! One iteration's record, shared by the log and plot sinks.

/// Immutable once produced; ownership of copies passes to the sinks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Seconds since the loop started.
    pub elapsed_s: f64,
    /// Process variable read this iteration.
    pub pv: f64,
    /// Valve operating point read back from the device.
    pub prior_op: f64,
    /// Output written this iteration.
    pub new_op: f64,
    /// Setpoint in force when the output was computed.
    pub setpoint: f64,
}

impl Sample {
    /// Values logged after the time column, in header order.
    pub fn log_values(&self) -> [f64; 4] {
        [self.pv, self.prior_op, self.new_op, self.setpoint]
    }

    /// Values the strip chart plots, in pen order.
    pub fn plot_values(&self) -> [f64; 3] {
        [self.pv, self.new_op, self.setpoint]
    }
}
