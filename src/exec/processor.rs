// src/exec/processor.rs

//! Launcher and completion waiter.
//!
//! A [`Processor`] owns the long-lived observer and runs one task at a time.
//! Each call to [`Processor::run`] is a self-contained session: a fresh event
//! queue, two drainer tasks, and a dispatcher running concurrently with the
//! launcher. `run` takes `&mut self`, so sessions can never overlap.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use anyhow::anyhow;
use tokio::io::AsyncRead;
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::errors::{Result, SpinrunError};
use crate::exec::dispatcher::dispatch;
use crate::exec::drainer::drain;
use crate::exec::{Observer, SessionEvent, Task};
use crate::types::{Outcome, ReadErrorPolicy, StreamKind};

/// Tunables for the supervision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorOptions {
    /// Minimum time between two idle calls while nothing is pending.
    pub idle_interval: Duration,
    /// Capacity of the bounded queue shared by both streams and the outcome.
    pub event_buffer: usize,
    /// How drainers react to a read error mid-stream.
    pub stream_errors: ReadErrorPolicy,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            idle_interval: Duration::from_millis(50),
            event_buffer: 64,
            stream_errors: ReadErrorPolicy::Lenient,
        }
    }
}

/// Runs tasks and reports their lifecycle to an [`Observer`].
#[derive(Debug)]
pub struct Processor<O: Observer> {
    observer: O,
    options: ProcessorOptions,
}

impl<O: Observer> Processor<O> {
    pub fn new(observer: O) -> Self {
        Self::with_options(observer, ProcessorOptions::default())
    }

    pub fn with_options(observer: O, options: ProcessorOptions) -> Self {
        Self { observer, options }
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Run `task` to completion and return its outcome.
    ///
    /// Returns only after the observer has received every event of the
    /// session, terminal handler included. A non-zero exit is an
    /// `Ok(Outcome::Failure)`; `Err` is reserved for setup failures
    /// (spawn, pipes, wait, strict stream errors), which are not routed
    /// through the observer.
    pub async fn run(&mut self, task: &Task) -> Result<Outcome> {
        self.supervise(task, || spawn_child(task)).await
    }

    /// One session around whatever child `spawn` produces.
    async fn supervise<C, F>(&mut self, task: &Task, spawn: F) -> Result<Outcome>
    where
        C: ChildProcess,
        F: FnOnce() -> Result<C>,
    {
        let options = self.options;
        let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(options.event_buffer.max(1));
        let (started_tx, started_rx) = oneshot::channel::<()>();

        // The dispatcher is polled before the launcher spawns anything, but
        // it stays silent until the child has actually started.
        let dispatcher = dispatch(
            &mut self.observer,
            &task.label,
            started_rx,
            event_rx,
            options.idle_interval,
        );
        let launcher = launch(task, spawn, event_tx, started_tx, options.stream_errors);

        let (launched, delivered) = tokio::join!(launcher, dispatcher);
        let outcome = launched?;

        match delivered {
            Some(delivered) if delivered == outcome => Ok(outcome),
            _ => Err(SpinrunError::Other(anyhow!(
                "dispatcher for task '{}' finished without delivering {:?}",
                task.label,
                outcome
            ))),
        }
    }
}

/// The parts of a running child the launcher needs.
pub(crate) trait ChildProcess {
    type Stdout: AsyncRead + Unpin + Send + 'static;
    type Stderr: AsyncRead + Unpin + Send + 'static;

    fn take_stdout(&mut self) -> Option<Self::Stdout>;
    fn take_stderr(&mut self) -> Option<Self::Stderr>;
    async fn wait_for_exit(&mut self) -> io::Result<ExitStatus>;
}

impl ChildProcess for Child {
    type Stdout = ChildStdout;
    type Stderr = ChildStderr;

    fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.stdout.take()
    }

    fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.stderr.take()
    }

    async fn wait_for_exit(&mut self) -> io::Result<ExitStatus> {
        self.wait().await
    }
}

fn spawn_child(task: &Task) -> Result<Child> {
    let mut cmd = Command::new(&task.program);
    cmd.args(&task.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    cmd.spawn().map_err(|source| SpinrunError::Spawn {
        task: task.label.clone(),
        source,
    })
}

/// Start the child, drain it, wait for it, and queue the outcome.
async fn launch<C>(
    task: &Task,
    spawn: impl FnOnce() -> Result<C>,
    events: mpsc::Sender<SessionEvent>,
    started: oneshot::Sender<()>,
    policy: ReadErrorPolicy,
) -> Result<Outcome>
where
    C: ChildProcess,
{
    info!(task = %task.label, cmd = %task.command_line(), "starting task process");

    let mut child = spawn()?;

    let stdout = child.take_stdout().ok_or_else(|| SpinrunError::Pipe {
        task: task.label.clone(),
        stream: StreamKind::Stdout,
    })?;
    let stderr = child.take_stderr().ok_or_else(|| SpinrunError::Pipe {
        task: task.label.clone(),
        stream: StreamKind::Stderr,
    })?;

    if started.send(()).is_err() {
        debug!(task = %task.label, "dispatcher gone before child start was reported");
    }

    let drainers = Drainers {
        stdout: tokio::spawn(drain(
            stdout,
            StreamKind::Stdout,
            task.label.clone(),
            events.clone(),
            policy,
        )),
        stderr: tokio::spawn(drain(
            stderr,
            StreamKind::Stderr,
            task.label.clone(),
            events.clone(),
            policy,
        )),
    };

    // Drain first, then query the exit status: no line may trail the outcome.
    let drained = drainers.join(&task.label).await;

    let status = child.wait_for_exit().await.map_err(|source| SpinrunError::Wait {
        task: task.label.clone(),
        source,
    })?;
    drained?;

    let outcome = classify(status);
    info!(
        task = %task.label,
        exit_code = status.code().unwrap_or(-1),
        success = outcome.is_success(),
        "task process exited"
    );

    events
        .send(SessionEvent::Exited(outcome))
        .await
        .map_err(|_| {
            SpinrunError::Other(anyhow!(
                "event queue for task '{}' closed before the outcome was sent",
                task.label
            ))
        })?;

    Ok(outcome)
}

/// Join handles for the two stream drainers of one session.
struct Drainers {
    stdout: JoinHandle<io::Result<usize>>,
    stderr: JoinHandle<io::Result<usize>>,
}

impl Drainers {
    /// Barrier: resolves once both streams reached end-of-stream.
    async fn join(self, task: &str) -> Result<()> {
        let (out, err) = tokio::join!(self.stdout, self.stderr);

        for (stream, joined) in [(StreamKind::Stdout, out), (StreamKind::Stderr, err)] {
            let lines = joined
                .map_err(|e| SpinrunError::Other(anyhow::Error::from(e)))?
                .map_err(|source| SpinrunError::StreamRead {
                    task: task.to_string(),
                    stream,
                    source,
                })?;
            debug!(task = %task, %stream, lines, "drainer finished");
        }

        Ok(())
    }
}

/// Reduce an exit status to the binary outcome.
///
/// Anything but a clean zero exit (non-zero code, killed by a signal) is a
/// failure.
fn classify(status: ExitStatus) -> Outcome {
    if status.success() {
        Outcome::Success
    } else {
        Outcome::Failure
    }
}
