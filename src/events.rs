use tokio::sync::mpsc::UnboundedSender;

use crate::prober::Sample;

/// Progress notifications emitted while the schedule loop runs, so the
/// console can render samples as they complete instead of waiting for the
/// full sequence.
#[derive(Debug, Clone)]
pub enum RunEvent {
    SampleCompleted { index: usize, sample: Sample },
    RunFinished { total: usize },
}

/// Observer handle the loop sends events through.
#[derive(Clone)]
pub struct EventSink {
    tx: Option<UnboundedSender<RunEvent>>,
}

impl EventSink {
    /// Sink that drops everything, for callers that don't listen.
    pub fn noop() -> Self {
        Self { tx: None }
    }

    pub fn new(tx: UnboundedSender<RunEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Best effort: a hung-up receiver never fails the run.
    pub fn send(&self, event: RunEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }
}
