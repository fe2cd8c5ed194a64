//! Trace Viewer Application
//!
//! Command-line front end of the trace-timeline library. It reads a trace
//! log, reconstructs every component and then either:
//! - opens one interactive timeline window per component, or
//! - prints a per-component summary (`--summary`)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use trace_timeline::Reconstructor;

mod app;
mod config;
mod interaction;
mod panel;
mod report;

use config::AppConfig;

/// Trace Viewer - Inspect component timelines from a trace log
#[derive(Parser, Debug)]
#[command(name = "trace-viewer")]
#[command(about = "Reconstruct and inspect component timelines from a trace log", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the trace log (six-line blocks, e.g. output.txt)
    #[arg(short, long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Path to configuration file (viewer.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only reconstruct these component pids (can be repeated)
    #[arg(long, value_name = "PID")]
    pid: Vec<String>,

    /// Print a per-component summary instead of opening windows
    #[arg(long)]
    summary: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Trace Viewer v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using timeline library v{}", trace_timeline::VERSION);

    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };
    config.apply_overrides(args.log.clone(), &args.pid);

    let Some(log_path) = config.input.log.clone() else {
        println!("Trace Viewer - No input specified");
        println!("\nQuick Start:");
        println!("  trace-viewer --log output.txt");
        println!("  trace-viewer --log output.txt --summary");
        println!("\nWith a configuration file:");
        println!("  trace-viewer --config viewer.toml");
        println!("\nUse --help for more options");
        return Ok(());
    };

    let outcome = Reconstructor::new(config.filtering.clone())
        .reconstruct_file(&log_path)
        .with_context(|| format!("Failed to read trace log: {:?}", log_path))?;

    if !outcome.malformed.is_empty() {
        log::warn!(
            "{} malformed blocks skipped in {:?}",
            outcome.malformed.len(),
            log_path
        );
    }

    if args.summary {
        report::print_summary(&log_path, &outcome);
        return Ok(());
    }

    app::run(log_path, outcome, config.view)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
