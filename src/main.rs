mod cmd;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use timetable::data::persistence;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "timetable.log";

#[derive(Parser)]
#[command(name = "timetable", about = "weekly class timetables side by side")]
struct Cli {
    /// Path to the data directory containing config.yaml and seed.json (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default config.yaml and seed.json
    Init,
    /// List every seed table and its schedules
    Tables,
    /// List the 24 time slots of a day
    Slots,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    persistence::set_data_dir(data_dir.clone());

    // Checked before the log file lands in the directory
    let needs_init = dir_needs_init(&data_dir);
    init_logging(&data_dir)?;
    info!(data_dir = %data_dir.display(), "starting");

    // Auto-init when the data directory is missing or empty and the user did not
    // explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && needs_init {
        eprintln!(
            "Data directory '{}' is missing or empty, running init...",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    match cli.command {
        None => cmd::root::run(),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Tables) => cmd::tables::run(),
        Some(Commands::Slots) => cmd::slots::run(),
    }
}

/// Sends `tracing` output to a file in the data directory; the TUI owns stdout.
fn init_logging(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create dir {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
