// src/engine/mod.rs

//! Sequencing of tasks on top of the process supervisor.
//!
//! A run is a list of [`Stage`]s, each with an optional header and a list of
//! tasks. Tasks run strictly one after another through a single
//! [`Processor`](crate::exec::Processor); the observer decides whether a
//! failure halts the sequence.

pub mod runner;

pub use runner::SequenceRunner;

use crate::exec::Task;

/// A group of tasks introduced by an optional header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub header: Option<String>,
    pub tasks: Vec<Task>,
}

impl Stage {
    pub fn new(header: Option<String>, tasks: Vec<Task>) -> Self {
        Self { header, tasks }
    }
}

/// Labels of the tasks that ran, split by outcome, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl SequenceReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}
