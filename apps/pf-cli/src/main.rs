use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use pf_app::AppResult;

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(about = "Pidflow CLI - closed-loop MODBUS process controller", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate settings file syntax and structure
    Validate {
        /// Path to the settings YAML file
        settings_path: PathBuf,
    },
    /// Run the control loop headless (enter 'c' to stop)
    Run {
        /// Path to the settings YAML file
        settings_path: PathBuf,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { settings_path } => cmd_validate(&settings_path),
        Commands::Run { settings_path } => cmd_run(&settings_path),
    }
}

fn cmd_validate(settings_path: &Path) -> AppResult<()> {
    println!("Validating settings: {}", settings_path.display());
    let doc = pf_app::validate_settings_file(settings_path)?;
    println!("✓ Settings are valid");
    println!(
        "  Controller: {} {} (setpoint {}, interval {} s)",
        doc.controller.control_mode,
        doc.controller.ctrl_type,
        doc.controller.set_point,
        doc.controller.interval
    );
    println!("  Transport:  {}", doc.transport.method);
    Ok(())
}

fn cmd_run(settings_path: &Path) -> AppResult<()> {
    println!("Starting control loop: {}", settings_path.display());
    let report = pf_app::run_headless(settings_path)?;

    println!("✓ Control loop stopped");
    println!("  Iterations: {}", report.iterations);
    if report.overruns > 0 {
        println!("  Interval overruns: {}", report.overruns);
    }
    if report.held_iterations > 0 {
        println!("  Held iterations:   {}", report.held_iterations);
    }
    Ok(())
}
