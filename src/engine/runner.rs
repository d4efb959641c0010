// src/engine/runner.rs

use tracing::{debug, info, warn};

use crate::engine::{SequenceReport, Stage};
use crate::errors::{Result, SpinrunError};
use crate::exec::{Observer, Processor};
use crate::types::Outcome;

/// Runs stages of tasks in order through one [`Processor`].
#[derive(Debug)]
pub struct SequenceRunner<O: Observer> {
    processor: Processor<O>,
}

impl<O: Observer> SequenceRunner<O> {
    pub fn new(processor: Processor<O>) -> Self {
        Self { processor }
    }

    pub fn processor(&self) -> &Processor<O> {
        &self.processor
    }

    pub fn into_processor(self) -> Processor<O> {
        self.processor
    }

    /// Run every stage in order.
    ///
    /// - Each stage's header (if any) goes to [`Observer::header`] first.
    /// - A failed task is recorded; if the observer's
    ///   [`halt_on_failure`](Observer::halt_on_failure) says so, the
    ///   sequence stops with [`SpinrunError::TaskFailed`] and no later task
    ///   is started.
    /// - Setup errors from the processor abort the sequence immediately.
    pub async fn run(&mut self, stages: &[Stage]) -> Result<SequenceReport> {
        let mut report = SequenceReport::default();

        for (index, stage) in stages.iter().enumerate() {
            if let Some(header) = &stage.header {
                self.processor.observer_mut().header(header);
            }
            debug!(stage = index, tasks = stage.tasks.len(), "starting stage");

            for task in &stage.tasks {
                match self.processor.run(task).await? {
                    Outcome::Success => report.succeeded.push(task.label.clone()),
                    Outcome::Failure => {
                        report.failed.push(task.label.clone());

                        if self.processor.observer().halt_on_failure() {
                            warn!(task = %task.label, "task failed; halting sequence");
                            return Err(SpinrunError::TaskFailed(task.label.clone()));
                        }
                        warn!(task = %task.label, "task failed; continuing sequence");
                    }
                }
            }
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "sequence finished"
        );
        Ok(report)
    }
}
