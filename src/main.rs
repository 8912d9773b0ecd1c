use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use kiruna_e2e::{report, runner, utils::config::Config, RunnerError};

#[derive(Parser)]
#[command(name = "kiruna-e2e")]
#[command(version = "0.1.0")]
#[command(about = "End-to-end scenario runner for the Kiruna document cards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the document card scenario
    Run {
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Page to start from
        #[arg(long)]
        url: Option<String>,

        /// Browser executable
        #[arg(long)]
        driver_path: Option<PathBuf>,

        /// File to attach to the new card. Can be specified multiple times.
        #[arg(long)]
        upload: Vec<PathBuf>,

        /// Run the browser without a window
        #[arg(long, default_value = "false")]
        headless: bool,

        /// Output directory for reports and screenshots
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Run log file
        #[arg(long)]
        log_file: Option<PathBuf>,

        /// Enable screenshot capture on failures
        #[arg(long, short = 's', default_value = "false")]
        snapshot: bool,

        /// Generate reports (JSON, JUnit)
        #[arg(long, default_value = "false")]
        report: bool,
    },

    /// Generate report from test results
    Report {
        /// Path to test results JSON
        results: PathBuf,

        /// Output format (json, junit)
        #[arg(short, long, default_value = "junit")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            url,
            driver_path,
            upload,
            headless,
            output,
            log_file,
            snapshot,
            report,
        } => {
            let mut config = Config::load(config.as_deref())?;
            if let Some(url) = url {
                config.target_url = url;
            }
            if driver_path.is_some() {
                config.driver_path = driver_path;
            }
            if !upload.is_empty() {
                config.upload_files = upload;
            }
            if let Some(output) = output {
                config.output_dir = output;
            }
            if let Some(log_file) = log_file {
                config.log_file = log_file;
            }
            config.headless |= headless;
            config.snapshot |= snapshot;
            config.report |= report;

            let result = runner::run_scenario(&config).await;
            match &result {
                Ok(summary) if summary.is_clean() => {
                    println!("\n{} {}", "✓".green().bold(), summary.describe());
                }
                Ok(summary) => {
                    let reason = if summary.is_aborted() {
                        "aborted"
                    } else {
                        "with failures"
                    };
                    println!(
                        "\n{} Finished {}: {}",
                        "✗".red().bold(),
                        reason,
                        summary.describe()
                    );
                }
                Err(e) => {
                    let kind = if e.downcast_ref::<RunnerError>().is_some() {
                        "Precondition violated"
                    } else {
                        "Could not start run"
                    };
                    eprintln!("{} {}: {:#}", "✗".red().bold(), kind, e);
                }
            }
            Ok(ExitCode::from(runner::exit_code(&result)))
        }
        Commands::Report {
            results,
            format,
            output,
        } => {
            report::generate_report(&results, &format, output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
