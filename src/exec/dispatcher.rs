// src/exec/dispatcher.rs

//! Event dispatcher: relays one session's events to the observer.
//!
//! The dispatcher moves through three states:
//! - `Initializing`: waits for the launcher to report that the child started,
//!   then calls [`Observer::initialize`] exactly once, followed by one
//!   [`Observer::on_idle`]. The launcher may already have queued the whole
//!   session by then, so this first idle call is unconditional.
//! - `Active`: waits on "next queued event OR idle tick". Queued events take
//!   priority; the idle tick only fires when nothing is pending, and at most
//!   once per `idle_interval`.
//! - `Terminated`: entered after the terminal handler ran (or the queue
//!   closed without an outcome). Returning from [`dispatch`] is the "done"
//!   signal the launcher waits for.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

use crate::exec::{Observer, SessionEvent};
use crate::types::{Outcome, StreamKind};

/// Smallest idle interval accepted; `tokio::time::interval` rejects zero.
const MIN_IDLE_INTERVAL: Duration = Duration::from_millis(1);

/// Drive `observer` through one run session.
///
/// Returns the outcome that was delivered, or `None` when the session ended
/// without one: either the child never started (`started` dropped, nothing is
/// delivered at all) or the queue closed early because the launcher hit a
/// setup error after the start.
pub async fn dispatch<O>(
    observer: &mut O,
    label: &str,
    started: oneshot::Receiver<()>,
    mut events: mpsc::Receiver<SessionEvent>,
    idle_interval: Duration,
) -> Option<Outcome>
where
    O: Observer + ?Sized,
{
    if started.await.is_err() {
        debug!(task = %label, "child was not started; no events delivered");
        return None;
    }

    observer.initialize(label);
    observer.on_idle();

    let period = idle_interval.max(MIN_IDLE_INTERVAL);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            event = events.recv() => match event {
                Some(SessionEvent::Line { stream: StreamKind::Stdout, text }) => {
                    observer.on_output_line(text);
                }
                Some(SessionEvent::Line { stream: StreamKind::Stderr, text }) => {
                    observer.on_error_line(text);
                }
                Some(SessionEvent::Exited(outcome)) => {
                    match outcome {
                        Outcome::Success => observer.on_success(),
                        Outcome::Failure => observer.on_failure(),
                    }
                    debug!(task = %label, ?outcome, "session terminated");
                    return Some(outcome);
                }
                None => {
                    debug!(task = %label, "event queue closed before an outcome");
                    return None;
                }
            },

            _ = ticker.tick() => observer.on_idle(),
        }
    }
}
