// src/exec/observer.rs

//! The capability set the supervisor drives during a run session.
//!
//! Every call is made from the dispatcher only, one session at a time, in
//! this order: `initialize`, then any mix of `on_idle` / `on_output_line` /
//! `on_error_line`, then exactly one of `on_success` / `on_failure`.
//! Nothing is delivered for a session after its terminal call.

/// Receiver of run-session lifecycle events.
///
/// Implementations are long-lived and may accumulate state across sessions
/// (e.g. an output history). Handlers must not block indefinitely; `on_idle`
/// is called at most once per idle interval and must not assume a fixed rate.
pub trait Observer {
    /// Called once at session start with the task label.
    fn initialize(&mut self, label: &str);

    /// Called whenever no event is pending.
    fn on_idle(&mut self);

    /// One stdout line, trailing newline removed.
    fn on_output_line(&mut self, line: String);

    /// One stderr line, trailing newline removed.
    fn on_error_line(&mut self, line: String);

    /// Terminal: the command exited cleanly.
    fn on_success(&mut self);

    /// Terminal: the command exited with a non-zero or abnormal status.
    fn on_failure(&mut self);

    /// Section header printed between groups of tasks. Not part of a session.
    fn header(&mut self, _text: &str) {}

    /// Whether a sequence of tasks should stop after a failed one.
    fn halt_on_failure(&self) -> bool {
        true
    }
}

impl<O: Observer + ?Sized> Observer for Box<O> {
    fn initialize(&mut self, label: &str) {
        (**self).initialize(label)
    }

    fn on_idle(&mut self) {
        (**self).on_idle()
    }

    fn on_output_line(&mut self, line: String) {
        (**self).on_output_line(line)
    }

    fn on_error_line(&mut self, line: String) {
        (**self).on_error_line(line)
    }

    fn on_success(&mut self) {
        (**self).on_success()
    }

    fn on_failure(&mut self) {
        (**self).on_failure()
    }

    fn header(&mut self, text: &str) {
        (**self).header(text)
    }

    fn halt_on_failure(&self) -> bool {
        (**self).halt_on_failure()
    }
}
