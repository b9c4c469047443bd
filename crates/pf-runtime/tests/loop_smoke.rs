use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use pf_controls::{ControlMode, ControlType, Controller};
use pf_modbus::codec::{decode_f32, encode_f32};
use pf_modbus::{LinkError, LinkResult, ModbusTransport, RegisterIo, RegisterKind};
use pf_runtime::{ExitSignal, LoopPhase, LoopRunner, PlotSink, RuntimeError, Sample, SampleLog};
use pf_settings::{
    ControlSnapshot, FaultPolicy, IoMap, RegisterAddress, StaticSettings,
};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("{}_{}", prefix, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

/// In-memory field device with separate input and holding banks.
struct DeviceStub {
    input: Vec<u16>,
    holding: Vec<u16>,
    fail_reads: bool,
    written: Arc<Mutex<Vec<Vec<u16>>>>,
}

impl DeviceStub {
    fn new(pv: f32, op: f32) -> Self {
        Self {
            input: encode_f32(&[pv]),
            holding: encode_f32(&[op]),
            fail_reads: false,
            written: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn written_handle(&self) -> Arc<Mutex<Vec<Vec<u16>>>> {
        Arc::clone(&self.written)
    }
}

impl RegisterIo for DeviceStub {
    fn connect(&mut self) -> LinkResult<()> {
        Ok(())
    }

    fn disconnect(&mut self) {}

    fn read_registers(
        &mut self,
        kind: RegisterKind,
        address: u16,
        count: u16,
    ) -> LinkResult<Vec<u16>> {
        if self.fail_reads {
            return Err(LinkError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "no response",
            )));
        }
        let bank = match kind {
            RegisterKind::Input => &self.input,
            RegisterKind::Holding => &self.holding,
            other => panic!("unexpected read of {other}"),
        };
        let start = address as usize;
        Ok(bank[start..start + count as usize].to_vec())
    }

    fn write_registers(
        &mut self,
        kind: RegisterKind,
        address: u16,
        values: &[u16],
    ) -> LinkResult<()> {
        assert_eq!(kind, RegisterKind::Holding);
        let start = address as usize;
        self.holding[start..start + values.len()].copy_from_slice(values);
        self.written.lock().unwrap().push(values.to_vec());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct CollectingPlot {
    samples: Arc<Mutex<Vec<Sample>>>,
    finished: Arc<Mutex<Option<String>>>,
}

impl PlotSink for CollectingPlot {
    fn data_update(&mut self, sample: &Sample) {
        self.samples.lock().unwrap().push(*sample);
    }

    fn close_block(&mut self, reason: &str) {
        *self.finished.lock().unwrap() = Some(reason.to_string());
    }
}

/// Trips the exit signal after a fixed number of polls.
struct CountdownExit {
    polls_left: u32,
}

impl ExitSignal for CountdownExit {
    fn poll_exit(&mut self) -> bool {
        if self.polls_left == 0 {
            return true;
        }
        self.polls_left -= 1;
        false
    }
}

fn p_controller(mode: ControlMode) -> Controller {
    Controller {
        mode,
        ctrl_type: ControlType::P,
        setpoint: 50.0,
        gain: 2.0,
        integral_time: 0.0,
        derivative_time: 0.0,
        interval: 0.01,
        limits_active: false,
        output_low_limit: 0.0,
        output_high_limit: 100.0,
        anti_windup: 0.3,
    }
}

fn snapshot(fault_policy: FaultPolicy) -> ControlSnapshot {
    ControlSnapshot {
        controller: p_controller(ControlMode::Auto),
        fault_policy,
    }
}

fn io_map() -> IoMap {
    IoMap {
        pv: RegisterAddress {
            kind: RegisterKind::Input,
            address: 0,
        },
        op: RegisterAddress {
            kind: RegisterKind::Holding,
            address: 0,
        },
    }
}

fn sample_log(dir: &PathBuf, name: &str) -> SampleLog {
    SampleLog::new(
        ["PV", "Prior OP", "New OP", "SP"].map(String::from).to_vec(),
        dir,
        Some(name.to_string()),
    )
}

#[test]
fn loop_runs_and_stops_on_exit_signal() {
    let dir = unique_temp_dir("pf_runtime_smoke");
    let plot = CollectingPlot::default();

    let mut runner = LoopRunner::new(
        ModbusTransport::new(DeviceStub::new(45.0, 30.0), true),
        StaticSettings(snapshot(FaultPolicy::Abort)),
        io_map(),
        sample_log(&dir, "smoke"),
        Box::new(plot.clone()),
        Box::new(CountdownExit { polls_left: 2 }),
    );

    runner.start().unwrap();
    assert_eq!(runner.phase(), LoopPhase::Connected);
    let report = runner.run().unwrap();
    assert_eq!(runner.phase(), LoopPhase::Idle);

    // Two polls return false, the third stops the loop: three iterations.
    assert_eq!(report.iterations, 3);
    assert_eq!(report.held_iterations, 0);

    // P law: error = 50 - 45 = 5, output = 10.0 every iteration.
    let samples = plot.samples.lock().unwrap();
    assert_eq!(samples.len(), 3);
    assert_eq!(samples[0].pv, 45.0);
    assert_eq!(samples[0].prior_op, 30.0);
    assert_eq!(samples[0].new_op, 10.0);
    // Later iterations read back the output written before them.
    assert_eq!(samples[1].prior_op, 10.0);

    assert_eq!(
        plot.finished.lock().unwrap().as_deref(),
        Some("exit signal")
    );

    // Header plus one row per iteration, flushed on stop.
    let content = std::fs::read_to_string(dir.join("smoke.csv")).unwrap();
    assert_eq!(content.lines().count(), 4);
}

#[test]
fn written_output_is_float_encoded() {
    let dir = unique_temp_dir("pf_runtime_encoding");

    let device = DeviceStub::new(45.0, 30.0);
    let written = device.written_handle();

    let mut runner = LoopRunner::new(
        ModbusTransport::new(device, true),
        StaticSettings(snapshot(FaultPolicy::Abort)),
        io_map(),
        sample_log(&dir, "encoding"),
        Box::new(pf_runtime::NullPlotSink),
        Box::new(CountdownExit { polls_left: 0 }),
    );

    runner.start().unwrap();
    runner.run().unwrap();

    // The single iteration wrote 10.0 as a packed float pair.
    let written = written.lock().unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0], encode_f32(&[10.0]));
    assert_eq!(decode_f32(&written[0]).unwrap(), vec![10.0]);
}

#[test]
fn exhausted_transport_aborts_and_flushes_log() {
    let dir = unique_temp_dir("pf_runtime_abort");
    let plot = CollectingPlot::default();

    let mut device = DeviceStub::new(45.0, 30.0);
    device.fail_reads = true;

    let mut runner = LoopRunner::new(
        ModbusTransport::new(device, true),
        StaticSettings(snapshot(FaultPolicy::Abort)),
        io_map(),
        sample_log(&dir, "abort"),
        Box::new(plot.clone()),
        Box::new(CountdownExit { polls_left: 100 }),
    );

    runner.start().unwrap();
    let err = runner.run().unwrap_err();
    assert!(matches!(err, RuntimeError::Link(ref link) if link.is_exhausted()));
    assert_eq!(runner.phase(), LoopPhase::Idle);

    // The fault path still flushed the header row.
    let content = std::fs::read_to_string(dir.join("abort.csv")).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(
        plot.finished
            .lock()
            .unwrap()
            .as_deref()
            .unwrap()
            .starts_with("fault")
    );
}

#[test]
fn hold_policy_keeps_the_loop_alive() {
    let dir = unique_temp_dir("pf_runtime_hold");

    let mut device = DeviceStub::new(45.0, 30.0);
    device.fail_reads = true;

    let mut runner = LoopRunner::new(
        ModbusTransport::new(device, true),
        StaticSettings(snapshot(FaultPolicy::Hold)),
        io_map(),
        sample_log(&dir, "hold"),
        Box::new(pf_runtime::NullPlotSink),
        Box::new(CountdownExit { polls_left: 2 }),
    );

    runner.start().unwrap();
    let report = runner.run().unwrap();
    assert_eq!(report.iterations, 0);
    assert_eq!(report.held_iterations, 3);
}

#[test]
fn run_without_start_is_rejected() {
    let dir = unique_temp_dir("pf_runtime_not_started");

    let mut runner = LoopRunner::new(
        ModbusTransport::new(DeviceStub::new(45.0, 30.0), true),
        StaticSettings(snapshot(FaultPolicy::Abort)),
        io_map(),
        sample_log(&dir, "not_started"),
        Box::new(pf_runtime::NullPlotSink),
        Box::new(CountdownExit { polls_left: 0 }),
    );

    assert!(matches!(runner.run(), Err(RuntimeError::NotConnected)));
}
