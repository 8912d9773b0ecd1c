use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Recorded result of one executed step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub index: usize,
    pub name: String,
    pub succeeded: bool,
    pub detail: Option<String>,
    pub duration_ms: u64,
    pub screenshot_path: Option<String>,
}

impl Outcome {
    pub fn passed(index: usize, name: &str, duration_ms: u64) -> Self {
        Self {
            index,
            name: name.to_string(),
            succeeded: true,
            detail: None,
            duration_ms,
            screenshot_path: None,
        }
    }

    pub fn failed(index: usize, name: &str, detail: String, duration_ms: u64) -> Self {
        Self {
            index,
            name: name.to_string(),
            succeeded: false,
            detail: Some(detail),
            duration_ms,
            screenshot_path: None,
        }
    }
}

/// Accumulator for one run. Outcomes are appended in execution order and never revised.
#[derive(Debug)]
pub struct RunState {
    run_id: String,
    outcomes: Vec<Outcome>,
    aborted_at: Option<usize>,
    started_at: Instant,
}

impl RunState {
    pub fn new(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            outcomes: Vec::new(),
            aborted_at: None,
            started_at: Instant::now(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    /// Mark the run as aborted by the required step at `index`
    pub fn abort(&mut self, index: usize) {
        self.aborted_at = Some(index);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted_at.is_some()
    }

    pub fn finish(self) -> RunSummary {
        let duration_ms = self.started_at.elapsed().as_millis() as u64;
        RunSummary::from_outcomes(&self.run_id, self.outcomes, self.aborted_at, duration_ms)
    }
}

/// Read-only aggregate over the outcomes of a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: String,
    pub total_steps: u32,
    pub succeeded_count: u32,
    pub failed_count: u32,
    /// Index of the required step that aborted the run, if any
    pub aborted_at: Option<usize>,
    pub duration_ms: u64,
    pub outcomes: Vec<Outcome>,
}

impl RunSummary {
    pub fn from_outcomes(
        run_id: &str,
        outcomes: Vec<Outcome>,
        aborted_at: Option<usize>,
        duration_ms: u64,
    ) -> Self {
        let succeeded_count = outcomes.iter().filter(|o| o.succeeded).count() as u32;
        let total_steps = outcomes.len() as u32;

        Self {
            run_id: run_id.to_string(),
            total_steps,
            succeeded_count,
            failed_count: total_steps - succeeded_count,
            aborted_at,
            duration_ms,
            outcomes,
        }
    }

    /// Fraction of succeeded steps, `None` when no step ran
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_steps == 0 {
            None
        } else {
            Some(self.succeeded_count as f64 / self.total_steps as f64)
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted_at.is_some()
    }

    /// True when every executed step succeeded and nothing was cut short
    pub fn is_clean(&self) -> bool {
        self.failed_count == 0 && !self.is_aborted()
    }

    pub fn describe(&self) -> String {
        let rate = match self.success_rate() {
            Some(rate) => format!("{:.2}% success rate", rate * 100.0),
            None => "success rate undefined".to_string(),
        };
        format!(
            "Summary: {} successful operations out of {} ({}), {} errors",
            self.succeeded_count, self.total_steps, rate, self.failed_count
        )
    }
}
