//! Wiring from a settings document to a running control loop.

use std::path::Path;

use tracing::info;

use pf_modbus::{FieldBus, ModbusTransport};
use pf_runtime::{
    LoopReport, LoopRunner, NullPlotSink, PlotSink, SampleLog, SharedExitFlag,
    spawn_stdin_watcher,
};
use pf_settings::{FileSettings, SettingsDoc, compile_settings, load_yaml};

use crate::error::AppResult;

/// Load and validate a settings document without touching the field device.
pub fn validate_settings_file(path: &Path) -> AppResult<SettingsDoc> {
    Ok(load_yaml(path)?)
}

/// Run the loop with no chart, stdin as the exit source.
pub fn run_headless(path: &Path) -> AppResult<LoopReport> {
    let exit = SharedExitFlag::new();
    let _watcher = spawn_stdin_watcher(exit.clone());
    run_with_sinks(path, Box::new(NullPlotSink), exit)
}

/// Run the loop with the given plot sink and exit flag.
///
/// The settings document is re-read every iteration through
/// [`FileSettings`], so edits to the tuning take effect live.
pub fn run_with_sinks(
    path: &Path,
    plot: Box<dyn PlotSink + Send>,
    exit: SharedExitFlag,
) -> AppResult<LoopReport> {
    let doc = load_yaml(path)?;
    let compiled = compile_settings(&doc)?;

    let transport = ModbusTransport::<FieldBus>::from_settings(compiled.link);
    let log = SampleLog::new(
        doc.logging.headers.clone(),
        doc.logging.directory.clone(),
        doc.logging.file_name.clone(),
    );
    let provider = FileSettings::new(path);

    let mut runner = LoopRunner::new(
        transport,
        provider,
        compiled.io_map,
        log,
        plot,
        Box::new(exit),
    );

    runner.start()?;
    info!(settings = %path.display(), "control loop started");
    Ok(runner.run()?)
}
