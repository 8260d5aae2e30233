#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Background Removal Runner
//!
//! Reads one image file, hands its bytes to a background removal capability,
//! and writes whatever the capability returns to a second file. The runner
//! never decodes or alters the image itself.
//!
//! ## Features
//!
//! - **Pluggable capability**: anything implementing [`BackgroundRemover`]
//! - **rembg backend**: talks to a rembg HTTP server (`rembg s`)
//! - **imgly backend**: in-process ONNX models via `imgly-bgremove` (enable `imgly`)
//! - **Atomic output**: the output file appears only once fully written
//! - **Typed errors**: input read, transform and output write failures are distinct
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bgremove_runner::{BackgroundRemovalRunner, RembgRemover, RunnerConfig};
//!
//! # fn example() -> bgremove_runner::Result<()> {
//! let config = RunnerConfig::builder()
//!     .input_path("assets/varco.png")
//!     .output_path("assets/varco_transparent.png")
//!     .build()?;
//! let remover = RembgRemover::new("http://localhost:7000/api/remove", "u2net")?;
//!
//! let runner = BackgroundRemovalRunner::new(config, Box::new(remover))?;
//! let report = runner.run()?;
//! println!("wrote {} bytes", report.output_bytes);
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom capability
//!
//! ```rust
//! use bgremove_runner::{BackgroundRemover, TransformError};
//!
//! struct Passthrough;
//!
//! impl BackgroundRemover for Passthrough {
//!     fn name(&self) -> &str {
//!         "passthrough"
//!     }
//!
//!     fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>, TransformError> {
//!         Ok(image.to_vec())
//!     }
//! }
//! ```
//!
//! ### Feature Flags
//!
//! - `cli` (default): command-line interface and tracing subscriber setup
//! - `imgly`: in-process backend built on the `imgly-bgremove` crate
//! - `tracing-json`: JSON log output for the CLI

pub mod backends;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod remover;
pub mod runner;
pub mod services;
#[cfg(feature = "cli")]
pub mod tracing_config;

// Public API exports
pub use backends::{create_remover, RembgRemover};
pub use config::{AppConfig, RemoverConfig, RunnerConfig, RunnerConfigBuilder};
pub use error::{FailureStage, RemovalError, Result};
pub use remover::{BackgroundRemover, TransformError};
pub use runner::{report_outcome, BackgroundRemovalRunner, RunReport, SUCCESS_MESSAGE};
pub use services::PayloadIOService;

#[cfg(feature = "imgly")]
pub use backends::ImglyRemover;

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, TracingConfig, TracingFormat};
