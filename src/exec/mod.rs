// src/exec/mod.rs

//! Process supervision layer.
//!
//! This module runs one external command per [`Processor::run`] call and
//! turns its lifecycle into an ordered stream of observer calls.
//!
//! - [`observer`] defines the [`Observer`] capability set the core drives.
//! - [`drainer`] reads one child stream line by line into the event queue.
//! - [`dispatcher`] owns the loop that relays queued events to the observer
//!   and issues idle ticks when nothing is pending.
//! - [`processor`] launches the child, joins the drainers before querying the
//!   exit status, and classifies the outcome.

pub mod dispatcher;
pub mod drainer;
pub mod observer;
pub mod processor;

pub use observer::Observer;
pub use processor::{Processor, ProcessorOptions};

use crate::types::{Outcome, StreamKind};

/// A labelled command to run. Arguments are passed to the program directly;
/// no shell is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub label: String,
    pub program: String,
    pub args: Vec<String>,
}

impl Task {
    pub fn new(label: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program and arguments joined with spaces, for logs and labels.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Events flowing from the drainers and the launcher into the dispatcher.
///
/// Both streams and the outcome share one FIFO queue, so an `Exited` event
/// sent after the drain barrier is always received after every line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Line { stream: StreamKind, text: String },
    Exited(Outcome),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_joins_program_and_args() {
        let task = Task::new("Greet", "echo").arg("hello").args(["big", "world"]);
        assert_eq!(task.command_line(), "echo hello big world");
        assert_eq!(Task::new("Nothing", "true").command_line(), "true");
    }
}
