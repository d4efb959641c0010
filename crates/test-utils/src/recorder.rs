use std::sync::{Arc, Mutex};

use spinrun::exec::Observer;

/// One observer call, as seen by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observed {
    Initialize(String),
    Idle,
    Out(String),
    Err(String),
    Success,
    Failure,
    Header(String),
}

impl Observed {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Observed::Success | Observed::Failure)
    }
}

/// An observer that records every call into a shared log.
///
/// Clone the log handle with [`RecordingObserver::log`] before handing the
/// observer to a `Processor`, then inspect it after the run.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    log: Arc<Mutex<Vec<Observed>>>,
    keep_going: bool,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder whose `halt_on_failure` returns `false`.
    pub fn keep_going() -> Self {
        Self {
            keep_going: true,
            ..Self::default()
        }
    }

    pub fn log(&self) -> Arc<Mutex<Vec<Observed>>> {
        Arc::clone(&self.log)
    }

    /// Snapshot of all recorded calls.
    pub fn events(&self) -> Vec<Observed> {
        self.log.lock().unwrap().clone()
    }

    /// Snapshot with idle ticks filtered out; the idle count is timing
    /// dependent, everything else is deterministic per stream.
    pub fn events_without_idle(&self) -> Vec<Observed> {
        self.events()
            .into_iter()
            .filter(|e| *e != Observed::Idle)
            .collect()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }

    fn push(&self, event: Observed) {
        self.log.lock().unwrap().push(event);
    }
}

impl Observer for RecordingObserver {
    fn initialize(&mut self, label: &str) {
        self.push(Observed::Initialize(label.to_string()));
    }

    fn on_idle(&mut self) {
        self.push(Observed::Idle);
    }

    fn on_output_line(&mut self, line: String) {
        self.push(Observed::Out(line));
    }

    fn on_error_line(&mut self, line: String) {
        self.push(Observed::Err(line));
    }

    fn on_success(&mut self) {
        self.push(Observed::Success);
    }

    fn on_failure(&mut self) {
        self.push(Observed::Failure);
    }

    fn header(&mut self, text: &str) {
        self.push(Observed::Header(text.to_string()));
    }

    fn halt_on_failure(&self) -> bool {
        !self.keep_going
    }
}
