#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;

use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::thread;

use clap::Parser;

use app::ScopeApp;
use pf_runtime::{ChannelPlotSink, SharedExitFlag};

#[derive(Parser)]
#[command(name = "pf-scope")]
#[command(about = "Pidflow live strip chart", long_about = None)]
struct Args {
    /// Path to the settings YAML file
    settings_path: PathBuf,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let doc = match pf_settings::load_yaml(&args.settings_path) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("Failed to load {}: {err}", args.settings_path.display());
            std::process::exit(2);
        }
    };

    let (tx, rx) = channel();
    let exit = SharedExitFlag::new();

    // The loop runs on a worker thread; the chart owns the main thread.
    // Samples cross over the channel.
    let worker = {
        let path = args.settings_path.clone();
        let exit = exit.clone();
        thread::spawn(move || pf_app::run_with_sinks(&path, Box::new(ChannelPlotSink::new(tx)), exit))
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_title("Pidflow Scope"),
        ..Default::default()
    };

    let plot_def = doc.plot.clone();
    let result = eframe::run_native(
        "Pidflow Scope",
        options,
        Box::new(move |cc| Ok(Box::new(ScopeApp::new(cc, plot_def, rx)))),
    );

    // Window dismissed: stop a still-running loop, then report.
    exit.trip();
    match worker.join() {
        Ok(Ok(report)) => {
            println!("✓ Control loop stopped");
            println!("  Iterations: {}", report.iterations);
            if report.overruns > 0 {
                println!("  Interval overruns: {}", report.overruns);
            }
        }
        Ok(Err(err)) => eprintln!("Control loop failed: {err}"),
        Err(_) => eprintln!("Control loop thread panicked"),
    }

    result
}
