//! CLI module for the bgremove-runner library
//!
//! This module is only available when the "cli" feature is enabled.

mod config;
#[path = "main.rs"]
mod main_impl;

pub use main_impl::{execute, main, Cli, CliBackend, CliLogFormat};
