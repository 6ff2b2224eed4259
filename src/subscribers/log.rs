//! # LogWriter: tracing-backed event sink
//!
//! The default subscriber. Writes every [`Event`] through `tracing` under the
//! `retryvisor` target; install any `tracing` subscriber to see the output.
//!
//! ## Levels
//! - `ERROR`: action or hook panicked
//! - `WARN`: wait interrupted, run aborted, caller timeout, refused wait, executor rejection
//! - `INFO`: recovered, non-retryable failure, attempts exhausted, deadline exceeded
//! - `DEBUG`: attempt starting/failed, interval scheduled, succeeded
//!
//! ## Example output
//! ```text
//! DEBUG retryvisor: attempt starting action="fetch" attempt=1
//! DEBUG retryvisor: attempt failed action="fetch" attempt=1 err="connection refused"
//! DEBUG retryvisor: interval scheduled action="fetch" attempt=2 delay=200ms
//!  WARN retryvisor: run aborted without result action="fetch" attempt=2
//! ```

use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Subscribe for LogWriter {
    fn on_event(&self, e: &Event) {
        let action = e.action.as_deref().unwrap_or("action");
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::AttemptStarting => {
                debug!(target: "retryvisor", action, attempt = ?e.attempt, elapsed = ?e.elapsed, "attempt starting");
            }
            EventKind::AttemptFailed => {
                debug!(target: "retryvisor", action, attempt = ?e.attempt, err = reason, "attempt failed");
            }
            EventKind::IntervalScheduled => {
                debug!(target: "retryvisor", action, attempt = ?e.attempt, delay = ?e.delay, "interval scheduled");
            }
            EventKind::Succeeded => {
                debug!(target: "retryvisor", action, attempt = ?e.attempt, elapsed = ?e.elapsed, "succeeded");
            }
            EventKind::WaitInterrupted => {
                warn!(target: "retryvisor", action, attempt = ?e.attempt, handling = reason, "interrupted while waiting for interval");
            }
            EventKind::RunAborted => {
                warn!(target: "retryvisor", action, attempt = ?e.attempt, "run aborted without result");
            }
            EventKind::ObserveTimeout => {
                warn!(target: "retryvisor", action, timeout = ?e.delay, "timed out waiting for result");
            }
            EventKind::ObserveRejected => {
                warn!(target: "retryvisor", action, err = reason, "blocking wait refused");
            }
            EventKind::ActionPanicked => {
                error!(target: "retryvisor", action, attempt = ?e.attempt, panic = reason, "action panicked");
            }
            EventKind::HookPanicked => {
                error!(target: "retryvisor", action, attempt = ?e.attempt, panic = reason, "hook panicked");
            }
            EventKind::ExecutorRejected => {
                warn!(target: "retryvisor", action, err = reason, "executor rejected run");
            }
            EventKind::DeadlineExceeded => {
                info!(target: "retryvisor", action, attempt = ?e.attempt, elapsed = ?e.elapsed, "deadline exceeded");
            }
            EventKind::NonRetryable => {
                info!(target: "retryvisor", action, attempt = ?e.attempt, err = reason, "failure is not retryable");
            }
            EventKind::AttemptsExhausted => {
                info!(target: "retryvisor", action, attempt = ?e.attempt, "attempts exhausted");
            }
            EventKind::Recovered => {
                info!(target: "retryvisor", action, attempt = ?e.attempt, stop = reason, "completed with recovery value");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
