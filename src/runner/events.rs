use super::state::RunSummary;
use tokio::sync::broadcast;

/// Run events for programmatic observers
#[derive(Debug, Clone)]
pub enum RunEvent {
    RunStarted {
        run_id: String,
        step_count: usize,
    },

    StepStarted {
        index: usize,
        name: String,
    },
    StepPassed {
        index: usize,
        name: String,
        duration_ms: u64,
    },
    StepFailed {
        index: usize,
        name: String,
        error: String,
        required: bool,
        duration_ms: u64,
    },

    /// A required step failed; `skipped` steps will not run
    RunAborted {
        index: usize,
        name: String,
        skipped: usize,
    },

    SessionReleased {
        error: Option<String>,
    },

    RunFinished {
        summary: RunSummary,
    },
}

/// Event emitter for broadcasting run events
pub struct EventEmitter {
    sender: broadcast::Sender<RunEvent>,
}

impl EventEmitter {
    pub fn emit(&self, event: RunEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(1024);
        Self { sender }
    }
}
