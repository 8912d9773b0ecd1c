use thiserror::Error;

/// Errors that escape [`ScenarioRunner::run`](crate::runner::executor::ScenarioRunner::run).
///
/// Step failures never show up here; they are recorded as outcomes. Only a run that
/// cannot meaningfully start is reported as an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunnerError {
    #[error("session is not established ({platform})")]
    SessionNotReady { platform: String },

    #[error("invalid step at index {index}: {reason}")]
    InvalidStep { index: usize, reason: String },
}

pub type RunnerResult<T> = std::result::Result<T, RunnerError>;
