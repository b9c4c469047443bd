//! The control loop runner.
//!
//! State machine: `Idle → Connected → Running → Stopping → Idle`. Each
//! iteration reads PV and OP, computes the next output, writes it back,
//! fans the sample out to the log and plot sinks, polls the exit signal,
//! and sleeps out the remainder of the interval.

use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use pf_controls::ControllerState;
use pf_modbus::{LinkError, ModbusTransport, RegisterIo};
use pf_settings::{ControlSnapshot, FaultPolicy, IoMap, RegisterAddress, SettingsProvider};

use crate::error::{RuntimeError, RuntimeResult};
use crate::exit::ExitSignal;
use crate::logsink::SampleLog;
use crate::pacing::IntervalPacer;
use crate::plot::PlotSink;
use crate::sample::Sample;

/// Where the loop is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Idle,
    Connected,
    Running,
    Stopping,
}

/// Summary returned when the loop stops on the exit signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopReport {
    /// Completed read-compute-write iterations.
    pub iterations: u64,
    /// Iterations that exceeded the configured interval.
    pub overruns: u64,
    /// Iterations skipped under the `hold` fault policy.
    pub held_iterations: u64,
}

/// Drives one controller against one field device.
pub struct LoopRunner<C: RegisterIo, P: SettingsProvider> {
    transport: ModbusTransport<C>,
    provider: P,
    io_map: IoMap,
    log: SampleLog,
    plot: Box<dyn PlotSink + Send>,
    exit: Box<dyn ExitSignal + Send>,
    state: ControllerState,
    phase: LoopPhase,
}

impl<C: RegisterIo, P: SettingsProvider> LoopRunner<C, P> {
    pub fn new(
        transport: ModbusTransport<C>,
        provider: P,
        io_map: IoMap,
        log: SampleLog,
        plot: Box<dyn PlotSink + Send>,
        exit: Box<dyn ExitSignal + Send>,
    ) -> Self {
        Self {
            transport,
            provider,
            io_map,
            log,
            plot,
            exit,
            state: ControllerState::default(),
            phase: LoopPhase::Idle,
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Open the transport and begin the log.
    pub fn start(&mut self) -> RuntimeResult<()> {
        self.transport.open()?;
        self.log.start()?;
        self.phase = LoopPhase::Connected;
        info!("control loop connected");
        Ok(())
    }

    /// Run iterations until the exit signal trips or a fault ends the loop.
    ///
    /// On every exit path the log is flushed and the transport closed
    /// before this returns.
    pub fn run(&mut self) -> RuntimeResult<LoopReport> {
        if self.phase != LoopPhase::Connected {
            return Err(RuntimeError::NotConnected);
        }
        self.phase = LoopPhase::Running;

        let run_start = Instant::now();
        let mut pacer = IntervalPacer::new();
        let mut iterations = 0u64;
        let mut held_iterations = 0u64;

        let outcome = loop {
            let iteration_start = Instant::now();

            let snapshot = match self.provider.control() {
                Ok(snapshot) => snapshot,
                Err(err) => break Err(RuntimeError::from(err)),
            };
            let interval = Duration::from_secs_f64(snapshot.controller.interval);

            match self.iterate(&snapshot, run_start) {
                Ok(()) => iterations += 1,
                Err(RuntimeError::Link(err))
                    if err.is_exhausted() && snapshot.fault_policy == FaultPolicy::Hold =>
                {
                    held_iterations += 1;
                    warn!(%err, "transport exhausted; holding previous output");
                }
                Err(err) => break Err(err),
            }

            if self.exit.poll_exit() {
                info!("exit signal observed");
                break Ok(());
            }
            pacer.pace(iteration_start, interval);
        };

        let reason = match &outcome {
            Ok(()) => "exit signal".to_string(),
            Err(err) => {
                error!(%err, "control loop fault");
                format!("fault: {err}")
            }
        };
        self.stop(&reason);

        outcome.map(|()| LoopReport {
            iterations,
            overruns: pacer.overruns(),
            held_iterations,
        })
    }

    /// One full iteration: read PV and OP, compute, write, fan out.
    fn iterate(&mut self, snapshot: &ControlSnapshot, run_start: Instant) -> RuntimeResult<()> {
        let cfg = &snapshot.controller;

        let pv = self.read_value(self.io_map.pv)?;
        let prior_op = self.read_value(self.io_map.op)?;

        let (next_state, new_op) = cfg.update(&self.state, pv, prior_op)?;
        self.transport
            .write(self.io_map.op.kind, self.io_map.op.address, &[new_op as f32])?;
        // Committed only after the write: a dropped write must not leave a
        // phantom error in the integral accumulator.
        self.state = next_state;

        let sample = Sample {
            elapsed_s: run_start.elapsed().as_secs_f64().round(),
            pv,
            prior_op,
            new_op,
            setpoint: cfg.setpoint,
        };
        if let Err(err) = self.log.write(&sample) {
            warn!(%err, "sample not logged");
        }
        self.plot.data_update(&sample);
        debug!(elapsed_s = sample.elapsed_s, pv, op = new_op, "heartbeat");
        Ok(())
    }

    fn read_value(&mut self, reg: RegisterAddress) -> RuntimeResult<f64> {
        let values = self.transport.read(reg.kind, reg.address, 1)?;
        let value = values.first().copied().ok_or(LinkError::Codec {
            what: "device returned no data",
        })?;
        Ok(value as f64)
    }

    /// Flush the log, close the transport, release the chart. Idempotent;
    /// runs on every exit path.
    pub fn stop(&mut self, reason: &str) {
        self.phase = LoopPhase::Stopping;
        if let Err(err) = self.log.stop() {
            warn!(%err, "log flush failed on shutdown");
        }
        self.transport.close();
        self.plot.close_block(reason);
        self.phase = LoopPhase::Idle;
    }
}
