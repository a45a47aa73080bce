//! territory-injector - merge faction territories into a master map file
//!
//! Reads the single master file from `ce/`, every territory file from
//! `input/`, and writes `output/<master>_injected.xml`. The master is backed
//! up to `backup/` first and never modified. Each run writes a session log
//! to `logs/`.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use territory_common::config::{load_toml_config, DirectoryLayout, RootFolderResolver};
use territory_common::logging::SessionLog;
use tracing::{error, info};

/// Exit code for a failed injection run
const EXIT_INJECTION_FAILED: u8 = 1;

/// Exit code for configuration errors (raised before any processing)
const EXIT_CONFIG: u8 = 2;

/// Command-line arguments for territory-injector
#[derive(Parser, Debug)]
#[command(name = "territory-injector")]
#[command(about = "Merge territory zones into a master map configuration file")]
#[command(version)]
struct Args {
    /// Root folder holding ce/, input/, output/, backup/ and logs/
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Master map file (default: the only .xml file in the master directory)
    #[arg(short, long)]
    master: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TERRITORY_INJECTOR_LOG")]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let (layout, level) = match prepare(&args) {
        Ok(prepared) => prepared,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let session = match SessionLog::start(&layout.log_dir, &level) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Failed to start session log: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    info!(
        "Starting territory-injector v{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("TERRITORY_INJECTOR_BUILD")
    );
    info!("Root folder: {}", layout.root.display());
    info!("Session log: {}", session.path().display());

    let master = match resolve_master(&args, &layout) {
        Ok(master) => master,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    match territory_injector::run(&layout, &master) {
        Ok(summary) => {
            info!(
                "Processed {} files, {} territory blocks",
                summary.input_files, summary.parsed_records
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("ERROR during injection: {}", e);
            ExitCode::from(EXIT_INJECTION_FAILED)
        }
    }
}

/// Load config, resolve the root folder and create the working directories
fn prepare(args: &Args) -> Result<(DirectoryLayout, String)> {
    let config = load_toml_config(args.config.as_deref())?;
    let root = RootFolderResolver::new(args.root.clone(), &config).resolve();

    let layout = DirectoryLayout::new(root, &config.directories);
    layout
        .ensure_directories_exist()
        .context("Failed to initialize working directories")?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    Ok((layout, level))
}

fn resolve_master(args: &Args, layout: &DirectoryLayout) -> Result<PathBuf> {
    match &args.master {
        Some(path) => {
            anyhow::ensure!(path.is_file(), "Master file not found: {}", path.display());
            info!("Using master map file: {}", path.display());
            Ok(path.clone())
        }
        None => Ok(layout.discover_master_file()?),
    }
}
