// src/display/plain.rs

//! Line-oriented observer with no cursor movement or color.

use std::io::{self, Stdout, Write};

use tracing::debug;

use crate::exec::Observer;

/// Writes one line per session event. Idle ticks produce no output.
pub struct PlainObserver<W: Write> {
    out: W,
    task_name: String,
    keep_going: bool,
}

impl PlainObserver<Stdout> {
    pub fn stdout(keep_going: bool) -> Self {
        Self::new(io::stdout(), keep_going)
    }
}

impl<W: Write> PlainObserver<W> {
    pub fn new(out: W, keep_going: bool) -> Self {
        Self {
            out,
            task_name: String::new(),
            keep_going,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            debug!(error = %err, "failed to write plain output");
        }
    }
}

impl<W: Write> Observer for PlainObserver<W> {
    fn initialize(&mut self, label: &str) {
        self.task_name = label.to_string();
        self.emit(format_args!("==> {label}"));
    }

    fn on_idle(&mut self) {}

    fn on_output_line(&mut self, line: String) {
        self.emit(format_args!("    {line}"));
    }

    fn on_error_line(&mut self, line: String) {
        self.emit(format_args!("  ! {line}"));
    }

    fn on_success(&mut self) {
        let name = std::mem::take(&mut self.task_name);
        self.emit(format_args!("[ok] {name}"));
    }

    fn on_failure(&mut self) {
        let name = std::mem::take(&mut self.task_name);
        self.emit(format_args!("[failed] {name}"));
    }

    fn header(&mut self, text: &str) {
        self.emit(format_args!("## {text}"));
    }

    fn halt_on_failure(&self) -> bool {
        !self.keep_going
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_line_per_event() {
        let mut obs = PlainObserver::new(Vec::new(), false);
        obs.header("Build");
        obs.initialize("compile");
        obs.on_idle();
        obs.on_output_line("cc main.c".to_string());
        obs.on_error_line("warning: unused".to_string());
        obs.on_failure();

        let text = String::from_utf8(obs.into_inner()).unwrap();
        assert_eq!(
            text,
            "## Build\n==> compile\n    cc main.c\n  ! warning: unused\n[failed] compile\n"
        );
    }

    #[test]
    fn halts_unless_keep_going() {
        assert!(PlainObserver::new(Vec::new(), false).halt_on_failure());
        assert!(!PlainObserver::new(Vec::new(), true).halt_on_failure());
    }
}
