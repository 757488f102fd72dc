//! Cubridor CLI Library
//!
//! Command-line interface for the Cubrir coverage reporter.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{AnalyzeArgs, Cli, ColorArg, Commands, FormatArg};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::ProgressReporter;
pub use runner::run_analyze;
