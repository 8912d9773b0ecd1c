use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{EventEmitter, RunEvent};
use super::run_log::RunLog;
use super::state::{Outcome, RunState, RunSummary};
use super::step::Step;
use crate::driver::traits::Session;
use crate::error::{RunnerError, RunnerResult};

/// Executes steps in order against a session, containing each step's failure
pub struct ScenarioRunner {
    log: RunLog,
    emitter: EventEmitter,
    snapshot_dir: Option<PathBuf>,
}

impl ScenarioRunner {
    pub fn new(log: RunLog) -> Self {
        Self {
            log,
            emitter: EventEmitter::default(),
            snapshot_dir: None,
        }
    }

    /// Save a screenshot into `dir` whenever a step fails
    pub fn with_failure_snapshots(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(dir.into());
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.emitter.subscribe()
    }

    /// Run `steps` against `session` and release the session.
    ///
    /// Step failures are recorded, never returned. The only errors are precondition
    /// violations, detected before any step runs. The session is closed exactly once on
    /// every path, including those.
    pub async fn run(
        &mut self,
        session: Box<dyn Session>,
        steps: &[Step],
    ) -> RunnerResult<RunSummary> {
        if let Err(e) = check_preconditions(session.as_ref(), steps) {
            self.log.error(&e.to_string());
            self.release(session).await;
            return Err(e);
        }

        let mut state = RunState::new(&Uuid::new_v4().to_string());
        self.emitter.emit(RunEvent::RunStarted {
            run_id: state.run_id().to_string(),
            step_count: steps.len(),
        });

        for (index, step) in steps.iter().enumerate() {
            let outcome = self.execute_step(session.as_ref(), index, step).await;
            let failed = !outcome.succeeded;
            state.record(outcome);

            if failed && step.is_required() {
                let skipped = steps.len() - index - 1;
                self.log.error(&format!(
                    "Required step '{}' failed, skipping {} remaining steps",
                    step.name(),
                    skipped
                ));
                self.emitter.emit(RunEvent::RunAborted {
                    index,
                    name: step.name().to_string(),
                    skipped,
                });
                state.abort(index);
                break;
            }
        }

        self.release(session).await;

        let summary = state.finish();
        self.log.info(&summary.describe());
        self.emitter.emit(RunEvent::RunFinished {
            summary: summary.clone(),
        });
        Ok(summary)
    }

    async fn execute_step(&mut self, session: &dyn Session, index: usize, step: &Step) -> Outcome {
        self.emitter.emit(RunEvent::StepStarted {
            index,
            name: step.name().to_string(),
        });

        let started = Instant::now();
        let result = AssertUnwindSafe(step.perform(session)).catch_unwind().await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let error = match result {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(format!("{:#}", e)),
            Err(panic) => Some(format!("panicked: {}", panic_message(panic.as_ref()))),
        };

        match error {
            None => {
                self.log.success(step.name());
                self.emitter.emit(RunEvent::StepPassed {
                    index,
                    name: step.name().to_string(),
                    duration_ms,
                });
                Outcome::passed(index, step.name(), duration_ms)
            }
            Some(detail) => {
                self.log.error(&format!("{}: {}", step.name(), detail));
                self.emitter.emit(RunEvent::StepFailed {
                    index,
                    name: step.name().to_string(),
                    error: detail.clone(),
                    required: step.is_required(),
                    duration_ms,
                });

                let mut outcome = Outcome::failed(index, step.name(), detail, duration_ms);
                outcome.screenshot_path = self.snapshot_failure(session, index, step).await;
                outcome
            }
        }
    }

    async fn snapshot_failure(
        &self,
        session: &dyn Session,
        index: usize,
        step: &Step,
    ) -> Option<String> {
        let dir = self.snapshot_dir.as_ref()?;
        if let Err(e) = std::fs::create_dir_all(dir) {
            log::warn!("cannot create snapshot directory {}: {}", dir.display(), e);
            return None;
        }

        let safe_name: String = step
            .name()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        let filename = format!(
            "fail_{}_{}_{}.png",
            index,
            safe_name,
            chrono::Local::now().format("%H%M%S")
        );
        let path = dir.join(filename).to_string_lossy().to_string();

        match session.take_screenshot(&path).await {
            Ok(()) => {
                log::info!("saved failure screenshot {}", path);
                Some(path)
            }
            Err(e) => {
                log::warn!("failure screenshot for '{}' not saved: {}", step.name(), e);
                None
            }
        }
    }

    async fn release(&mut self, session: Box<dyn Session>) {
        let error = match session.close().await {
            Ok(()) => {
                self.log.info("Session released");
                None
            }
            Err(e) => {
                self.log.error(&format!("Session release failed: {:#}", e));
                Some(e.to_string())
            }
        };
        self.emitter.emit(RunEvent::SessionReleased { error });
    }
}

fn check_preconditions(session: &dyn Session, steps: &[Step]) -> RunnerResult<()> {
    if !session.is_ready() {
        return Err(RunnerError::SessionNotReady {
            platform: session.platform_name().to_string(),
        });
    }

    if let Some((index, _)) = steps
        .iter()
        .enumerate()
        .find(|(_, step)| step.name().trim().is_empty())
    {
        return Err(RunnerError::InvalidStep {
            index,
            reason: "step name is empty".to_string(),
        });
    }

    Ok(())
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
