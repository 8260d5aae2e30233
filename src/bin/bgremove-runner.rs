//! Background removal runner CLI
//!
//! Command-line entry point: one input image in, one background-free image out.

#[cfg(feature = "cli")]
use bgremove_runner::cli;

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    cli::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
