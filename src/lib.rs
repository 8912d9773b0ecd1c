pub mod driver;
pub mod error;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod utils;

// Re-export common items
pub use error::{RunnerError, RunnerResult};
pub use report::generate_report;
pub use runner::preview::{verify_preview, PreviewField, PreviewVerdict};
pub use runner::{run_scenario, RunSummary, ScenarioRunner, Step};
