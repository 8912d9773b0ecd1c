use super::types::TestResults;
use anyhow::{Context, Result};
use std::path::Path;

pub const RESULTS_FILE: &str = "test-results.json";

/// Generate JSON report
pub fn generate(results: &TestResults, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;

    if let Some(path) = output {
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("JSON report saved to: {}", path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

/// Read results saved by [`generate`]
pub fn load(path: &Path) -> Result<TestResults> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid results in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::{Outcome, RunSummary};

    #[test]
    fn test_saved_results_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RESULTS_FILE);
        let summary = RunSummary::from_outcomes(
            "run-1",
            vec![
                Outcome::passed(0, "Open target page", 120),
                Outcome::failed(1, "Click Save", "timeout".into(), 10_000),
            ],
            Some(1),
            10_120,
        );

        generate(&TestResults::new(summary.clone()), Some(&path)).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"succeededCount\": 1"));
        assert!(raw.contains("\"abortedAt\": 1"));
        assert_eq!(load(&path).unwrap().summary, summary);
    }
}
