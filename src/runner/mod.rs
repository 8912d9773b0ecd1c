pub mod events;
pub mod executor;
pub mod run_log;
pub mod preview;
pub mod state;
pub mod step;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::driver;
use crate::report;
use crate::scenario::DocumentCardScenario;
use crate::utils::config::Config;

pub use events::*;
pub use executor::ScenarioRunner;
pub use state::*;
pub use step::{Action, Step};

/// Run the document card scenario against a freshly launched browser
///
/// Step failures end up in the returned summary. Errors are reserved for runs that could
/// not start: unusable log file, browser launch failure or a precondition violation.
pub async fn run_scenario(config: &Config) -> Result<RunSummary> {
    let run_log = run_log::RunLog::file_and_console(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;
    println!("Logging to {}", config.log_file.display());

    let steps = DocumentCardScenario::from_config(config).steps();
    println!(
        "{} Running {} steps against {}",
        "▶".green().bold(),
        steps.len(),
        config.target_url.cyan()
    );

    let session = driver::connect(config).await?;

    let mut runner = ScenarioRunner::new(run_log);
    if config.snapshot {
        runner = runner.with_failure_snapshots(&config.output_dir);
    }
    let summary = runner.run(session, &steps).await?;

    if config.report {
        // Reports are a by-product; a write failure does not change the run's result
        if let Err(e) = report::write_reports(&summary, &config.output_dir) {
            eprintln!("{} Failed to write reports: {:#}", "⚠".yellow(), e);
        }
    }

    Ok(summary)
}

/// Process exit code for the outcome of [`run_scenario`]
///
/// 0 for a clean run, 1 when a step failed or a required step aborted the run, 2 when the
/// run could not start.
pub fn exit_code(result: &Result<RunSummary>) -> u8 {
    match result {
        Ok(summary) if summary.is_clean() => 0,
        Ok(_) => 1,
        Err(_) => 2,
    }
}
