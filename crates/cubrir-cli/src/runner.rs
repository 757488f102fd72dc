//! Analyze command handler.

use crate::commands::{AnalyzeArgs, FormatArg};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use cubrir::{load_test_cases, CoveragePipeline, TextFormatter};
use std::path::PathBuf;
use tracing::info;

/// Run the analyze command. Returns `true` when every test passed.
pub fn run_analyze(config: &CliConfig, args: &AnalyzeArgs) -> CliResult<bool> {
    let problem_id = match &args.problem_id {
        Some(id) => id.clone(),
        None => args
            .file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                CliError::invalid_argument(format!(
                    "cannot derive a problem id from {}",
                    args.file.display()
                ))
            })?,
    };

    let mut reporter = ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    let cases = load_test_cases(&args.tests)?;
    info!(
        candidate = %args.file.display(),
        tests = cases.len(),
        problem_id,
        "starting analysis"
    );

    // The flag overrides the configured report directory.
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output_dir));
    let mut pipeline = CoveragePipeline::new(&output_dir);
    if args.no_html {
        pipeline = pipeline.without_html();
    }

    reporter.start_spinner(&format!("Analyzing {problem_id}"));
    let outcome = pipeline.analyze(&args.file, &cases, &problem_id);
    reporter.finish();
    let outcome = outcome?;

    match args.format {
        FormatArg::Text => print!("{}", TextFormatter::new(&outcome).generate()),
        FormatArg::Json => {
            let json = serde_json::to_string_pretty(&outcome)
                .map_err(|e| CliError::report_generation(e.to_string()))?;
            println!("{json}");
        }
    }

    if let Some(error) = &outcome.report_error {
        reporter.warning(error);
    }
    let all_passed = outcome.failed == 0;
    if all_passed {
        reporter.success(&format!("{}/{} tests passed", outcome.passed, outcome.total));
    } else {
        reporter.failure(&format!(
            "{}/{} tests failed",
            outcome.failed, outcome.total
        ));
    }
    Ok(all_passed)
}
