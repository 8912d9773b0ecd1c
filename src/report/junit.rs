use super::types::TestResults;
use crate::runner::state::Outcome;
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const JUNIT_FILE: &str = "junit.xml";

fn seconds(ms: u64) -> String {
    (ms as f64 / 1000.0).to_string()
}

/// Generate JUnit XML report string from TestResults
pub fn generate_junit_xml(results: &TestResults) -> Result<String> {
    let summary = &results.summary;
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let tests = summary.total_steps.to_string();
    let failures = summary.failed_count.to_string();
    let time = seconds(summary.duration_ms);

    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "kiruna-e2e"));
    suites_start.push_attribute(("tests", tests.as_str()));
    suites_start.push_attribute(("failures", failures.as_str()));
    suites_start.push_attribute(("time", time.as_str()));
    writer.write_event(Event::Start(suites_start))?;

    // One suite per run, one case per executed step
    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", "document-cards"));
    suite_start.push_attribute(("tests", tests.as_str()));
    suite_start.push_attribute(("failures", failures.as_str()));
    suite_start.push_attribute(("id", summary.run_id.as_str()));
    suite_start.push_attribute(("time", time.as_str()));
    suite_start.push_attribute(("timestamp", results.generated_at.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    if let Some(index) = summary.aborted_at {
        writer.write_event(Event::Start(BytesStart::new("properties")))?;
        let mut property = BytesStart::new("property");
        property.push_attribute(("name", "abortedAt"));
        property.push_attribute(("value", index.to_string().as_str()));
        writer.write_event(Event::Empty(property))?;
        writer.write_event(Event::End(BytesEnd::new("properties")))?;
    }

    for outcome in &summary.outcomes {
        write_test_case(&mut writer, outcome)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let xml = String::from_utf8(writer.into_inner().into_inner())?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(writer: &mut Writer<W>, outcome: &Outcome) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", outcome.name.as_str()));
    case_start.push_attribute(("classname", "kiruna_e2e.scenario"));
    case_start.push_attribute(("time", seconds(outcome.duration_ms).as_str()));
    writer.write_event(Event::Start(case_start))?;

    if !outcome.succeeded {
        let message = outcome.detail.as_deref().unwrap_or("Unknown error");
        let mut fail_start = BytesStart::new("failure");
        fail_start.push_attribute(("message", message));
        fail_start.push_attribute(("type", "StepFailure"));
        writer.write_event(Event::Start(fail_start))?;
        writer.write_event(Event::Text(BytesText::new(message)))?;
        writer.write_event(Event::End(BytesEnd::new("failure")))?;
    }

    if let Some(path) = &outcome.screenshot_path {
        writer.write_event(Event::Start(BytesStart::new("system-out")))?;
        writer.write_event(Event::Text(BytesText::new(&format!(
            "[[ATTACHMENT|{}]]",
            path
        ))))?;
        writer.write_event(Event::End(BytesEnd::new("system-out")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Write report to file
pub fn write_report(results: &TestResults, output_dir: &Path) -> Result<PathBuf> {
    let xml = generate_junit_xml(results)?;
    let path = output_dir.join(JUNIT_FILE);
    std::fs::write(&path, xml)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::RunSummary;

    fn results(aborted_at: Option<usize>) -> TestResults {
        let mut failed = Outcome::failed(
            1,
            "Verify new card preview",
            "title mismatch: \"Y\" != \"X\"".to_string(),
            2000,
        );
        failed.screenshot_path = Some("output/fail_1_Verify_new_card_preview_120000.png".into());

        TestResults {
            summary: RunSummary::from_outcomes(
                "test-run",
                vec![Outcome::passed(0, "Open target page", 1500), failed],
                aborted_at,
                3500,
            ),
            generated_at: "2023-01-01T12:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_generate_junit_xml() {
        let xml = generate_junit_xml(&results(None)).expect("Failed to generate XML");

        assert!(xml.contains(r#"<testsuites name="kiruna-e2e""#));
        assert!(xml.contains(r#"tests="2""#));
        assert!(xml.contains(r#"failures="1""#));
        assert!(xml.contains(r#"id="test-run""#));
        assert!(xml.contains(r#"<testcase name="Open target page""#));
        assert!(xml.contains(r#"time="1.5""#));
        assert!(xml.contains("message=\"title mismatch: &quot;Y&quot; != &quot;X&quot;\""));
        assert!(xml.contains("[[ATTACHMENT|output/fail_1_Verify_new_card_preview_120000.png]]"));
        assert!(!xml.contains("abortedAt"));
    }

    #[test]
    fn test_aborted_run_has_property() {
        let xml = generate_junit_xml(&results(Some(1))).unwrap();
        assert!(xml.contains(r#"<property name="abortedAt" value="1"/>"#));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&results(None), dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), JUNIT_FILE);
        assert!(std::fs::read_to_string(path).unwrap().starts_with("<?xml"));
    }
}
