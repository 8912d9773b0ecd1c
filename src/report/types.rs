use crate::runner::state::RunSummary;
use serde::{Deserialize, Serialize};

/// Test results for report generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResults {
    pub summary: RunSummary,
    pub generated_at: String,
}

impl TestResults {
    pub fn new(summary: RunSummary) -> Self {
        Self {
            summary,
            generated_at: chrono::Local::now().to_rfc3339(),
        }
    }
}
