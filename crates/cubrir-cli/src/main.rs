//! Cubridor CLI: coverage analysis for candidate functions
//!
//! ## Usage
//!
//! ```bash
//! cubridor analyze candidate.py --tests tests.txt
//! cubridor analyze candidate.py --tests tests.txt --format json --no-html
//! ```

use clap::Parser;
use cubridor::{Cli, CliConfig, CliResult, Commands, Verbosity};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    match run(&config, &cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(config: &CliConfig, command: &Commands) -> CliResult<bool> {
    match command {
        Commands::Analyze(args) => cubridor::run_analyze(config, args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };
    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(cli.color.into())
}

fn init_tracing(verbosity: Verbosity) {
    let default_level = match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "info",
        Verbosity::Debug => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
