//! Fixed-interval pacing.
//!
//! Each iteration's sleep is computed against its own start instant:
//! `sleep(max(0, interval - elapsed))`. An overrunning iteration proceeds
//! immediately — no negative sleep, no catch-up skipping, no cross-iteration
//! drift correction.

use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

/// Paces the loop to a wall-clock interval and counts overruns.
#[derive(Debug, Default)]
pub struct IntervalPacer {
    overruns: u64,
}

impl IntervalPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterations whose compute + I/O time exceeded the interval.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Sleep out the remainder of `interval` relative to `iteration_start`.
    pub fn pace(&mut self, iteration_start: Instant, interval: Duration) {
        match remaining(iteration_start.elapsed(), interval) {
            Some(sleep) => thread::sleep(sleep),
            None => {
                self.overruns += 1;
                debug!(
                    total = self.overruns,
                    "iteration overran the loop interval"
                );
            }
        }
    }
}

/// Time left in the interval, or `None` on overrun.
fn remaining(elapsed: Duration, interval: Duration) -> Option<Duration> {
    interval.checked_sub(elapsed).filter(|d| !d.is_zero())
}
