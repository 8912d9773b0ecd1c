pub mod json;
pub mod junit;
pub mod types;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::runner::state::RunSummary;
use types::TestResults;

/// Write `test-results.json` and `junit.xml` for a finished run
pub fn write_reports(summary: &RunSummary, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let results = TestResults::new(summary.clone());

    let json_path = output_dir.join(json::RESULTS_FILE);
    json::generate(&results, Some(&json_path))?;
    let junit_path = junit::write_report(&results, output_dir)?;
    println!("JUnit report saved to: {}", junit_path.display());

    Ok(vec![json_path, junit_path])
}

/// Generate report from test results
pub fn generate_report(results_path: &Path, format: &str, output: Option<&Path>) -> Result<()> {
    let test_results = json::load(results_path)?;

    match format {
        "json" => json::generate(&test_results, output),
        "junit" => {
            let xml = junit::generate_junit_xml(&test_results)?;
            match output {
                Some(path) => {
                    std::fs::write(path, xml)?;
                    println!("JUnit report saved to: {}", path.display());
                }
                None => println!("{}", xml),
            }
            Ok(())
        }
        _ => anyhow::bail!("Unknown format: {}", format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::Outcome;

    #[test]
    fn test_reports_regenerate_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let summary = RunSummary::from_outcomes(
            "run-2",
            vec![Outcome::passed(0, "Open Documents page", 40)],
            None,
            40,
        );

        let written = write_reports(&summary, &dir.path().join("out")).unwrap();
        assert_eq!(written.len(), 2);

        let xml_path = dir.path().join("again.xml");
        generate_report(&written[0], "junit", Some(&xml_path)).unwrap();
        assert!(std::fs::read_to_string(&xml_path)
            .unwrap()
            .contains(r#"<testcase name="Open Documents page""#));

        assert!(generate_report(&written[0], "html", None).is_err());
    }
}
