//! pf-runtime: the fixed-interval control loop and its sinks.
//!
//! One iteration runs fully to completion — read, compute, write, log,
//! plot, exit poll, sleep — before the next begins. The only suspension
//! point is the interval sleep; transport calls block synchronously and an
//! in-flight retry sequence always runs to completion or exhaustion before
//! the exit signal is checked.

pub mod error;
pub mod exit;
pub mod logsink;
pub mod pacing;
pub mod plot;
pub mod runner;
pub mod sample;

pub use error::{RuntimeError, RuntimeResult};
pub use exit::{ExitSignal, SharedExitFlag, spawn_stdin_watcher};
pub use logsink::{LogError, LogResult, SampleLog};
pub use pacing::IntervalPacer;
pub use plot::{ChannelPlotSink, NullPlotSink, PlotMessage, PlotSink, TraceBuffer};
pub use runner::{LoopPhase, LoopReport, LoopRunner};
pub use sample::Sample;
