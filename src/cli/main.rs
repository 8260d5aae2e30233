//! Background removal runner CLI
//!
//! Reads one image, removes its background, writes one image, and prints a
//! single outcome line. The exit status is zero whether or not the run
//! succeeded; only failures to set up logging or write to stdout are fatal.

use super::config::CliConfigBuilder;
use crate::{
    backends::create_remover,
    runner::{report_outcome, BackgroundRemovalRunner},
    tracing_config::{init_cli_tracing, TracingFormat},
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

/// Remove the background from one image
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "bgremove-runner")]
pub struct Cli {
    /// Input image file [default: assets/varco.png]
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output image file [default: assets/varco_transparent.png]
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// JSON configuration file; command-line flags override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Background removal backend [default: rembg]
    #[arg(short, long, value_enum)]
    pub backend: Option<CliBackend>,

    /// rembg server endpoint [default: http://localhost:7000/api/remove]
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// rembg model name [default: u2net]
    #[arg(short, long)]
    pub model: Option<String>,

    /// Model repository for the imgly backend [default: https://huggingface.co/imgly/isnet-general-onnx]
    #[cfg(feature = "imgly")]
    #[arg(long, value_name = "URL")]
    pub model_url: Option<String>,

    /// Enable verbose logging on stderr (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format on stderr
    #[arg(long, value_enum, default_value_t = CliLogFormat::Console)]
    pub log_format: CliLogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum CliBackend {
    /// rembg HTTP server
    Rembg,
    /// In-process imgly-bgremove models
    #[cfg(feature = "imgly")]
    Imgly,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum CliLogFormat {
    /// Colored human-readable lines
    Console,
    /// Plain lines without colors, for CI logs
    Compact,
    /// One JSON object per event
    #[cfg(feature = "tracing-json")]
    Json,
}

impl From<CliLogFormat> for TracingFormat {
    fn from(format: CliLogFormat) -> Self {
        match format {
            CliLogFormat::Console => TracingFormat::Console,
            CliLogFormat::Compact => TracingFormat::Compact,
            #[cfg(feature = "tracing-json")]
            CliLogFormat::Json => TracingFormat::Json,
        }
    }
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();

    init_cli_tracing(cli.verbose, cli.log_format.into()).context("Failed to initialize tracing")?;

    let mut stdout = io::stdout().lock();
    execute(&cli, &mut stdout).context("Failed to write outcome to stdout")?;

    Ok(())
}

/// Build a runner from `cli`, run it, and print the outcome line to `out`
///
/// Returns whether the run succeeded.
///
/// # Errors
/// - Writing to `out` failed
pub fn execute<W: Write>(cli: &Cli, out: &mut W) -> io::Result<bool> {
    let outcome = build_runner(cli).and_then(|runner| runner.run());
    report_outcome(&outcome, out)?;
    out.flush()?;
    Ok(outcome.is_ok())
}

fn build_runner(cli: &Cli) -> crate::Result<BackgroundRemovalRunner> {
    let config = CliConfigBuilder::from_cli(cli)?;

    info!(
        input = %config.runner.input_path.display(),
        output = %config.runner.output_path.display(),
        backend = config.remover.backend_name(),
        "Starting background removal"
    );

    let remover = create_remover(&config.remover)?;
    BackgroundRemovalRunner::new(config.runner, remover)
}
