//! # potree-extract
//!
//! Entry point. Logs go to stderr through `tracing`; stdout carries only the
//! report. Any error ends the process with exit code 1.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use potree_extract::cli::{Cli, Commands, ExtractArgs};
use potree_extract::report::{log_summary, write_report};
use potree_frame::read_response;
use potree_invoke::{ConfigLayer, run_captured};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if let Err(io) = e.print() {
                eprintln!("{e}");
                eprintln!("Error: failed to print usage: {io}");
            }
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract(args) => extract(&args),
        Commands::Decode {
            file,
            preview_bytes,
        } => decode_file(&file, preview_bytes),
    }
}

/// Initialize tracing subscriber for logging.
///
/// Reads `RUST_LOG`, defaulting to `info`.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Resolve settings from env, file and flags, run the tool and report.
fn extract(args: &ExtractArgs) -> Result<()> {
    let mut layer = ConfigLayer::from_env().context("Failed to read environment settings")?;

    if let Some(path) = &args.config {
        let file = ConfigLayer::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?;
        layer = layer.merge(file);
    }

    let config = layer
        .merge(args.overrides())
        .build()
        .context("Incomplete extraction settings")?;

    let captured = run_captured(&config).context("Failed to run extraction")?;

    if let Some(path) = &args.save {
        fs::write(path, captured.stdout())
            .with_context(|| format!("Failed to save response to {}", path.display()))?;
        info!(path = %path.display(), bytes = captured.stdout().len(), "Saved raw response");
    }

    let response = captured
        .into_response()
        .context("Extraction did not produce a valid response")?;
    let frame = response.as_frame();

    log_summary(&frame);
    write_report(&mut io::stdout().lock(), &frame, args.preview_bytes)
        .context("Failed to write report")
}

/// Decode a response captured earlier with `--save` and report it.
fn decode_file(path: &Path, preview_bytes: usize) -> Result<()> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let response = read_response(BufReader::new(file))
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    let frame = response.as_frame();

    log_summary(&frame);
    write_report(&mut io::stdout().lock(), &frame, preview_bytes)
        .context("Failed to write report")
}
