//! CLI command definitions using clap

use crate::config::ColorChoice;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cubridor: CLI for Cubrir - statement and branch coverage reporter
#[derive(Parser, Debug)]
#[command(name = "cubridor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run assertion test cases against a candidate file and report coverage
    Analyze(AnalyzeArgs),
}

/// Arguments for the analyze command
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Candidate source file
    pub file: PathBuf,

    /// Test cases file, one assertion per line
    #[arg(short, long)]
    pub tests: PathBuf,

    /// Problem identifier (defaults to the candidate file stem)
    #[arg(short, long)]
    pub problem_id: Option<String>,

    /// Directory for HTML report artifacts (defaults to the configured
    /// directory, `coverage_reports`)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output format for the summary
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,

    /// Skip writing the HTML artifact
    #[arg(long)]
    pub no_html: bool,
}

/// Summary output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Fixed-layout text summary
    #[default]
    Text,
    /// Serialized coverage outcome
    Json,
}

/// Color argument wrapper for clap
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Detect terminal
    #[default]
    Auto,
    /// Force colors on
    Always,
    /// Force colors off
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
