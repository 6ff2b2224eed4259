//! # Events emitted while a retry run makes progress.
//!
//! The [`EventKind`] enum classifies events across three categories:
//! - **Attempt events**: one attempt's flow (starting, failed, interval scheduled)
//! - **Terminal events**: why the run finished (succeeded, recovered, aborted, and the stop reason)
//! - **Observer events**: problems seen by callers (blocking timeout, refused wait, executor rejection)
//!
//! The [`Event`] struct carries the action name, attempt number, delays and a reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::AttemptFailed)
//!     .with_action("fetch")
//!     .with_reason("connection refused")
//!     .with_attempt(3);
//!
//! assert_eq!(ev.kind, EventKind::AttemptFailed);
//! assert_eq!(ev.action.as_deref(), Some("fetch"));
//! assert_eq!(ev.attempt, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of run events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Attempt events ===
    /// An attempt is about to invoke the action.
    ///
    /// Sets: `action`, `attempt`, `elapsed` (since run start).
    AttemptStarting,

    /// An attempt failed; the failure hook has been (or is being) invoked.
    ///
    /// Sets: `action`, `attempt`, `reason` (failure message).
    AttemptFailed,

    /// A wait was scheduled before the next attempt.
    ///
    /// Sets: `action`, `attempt` (upcoming attempt), `delay`.
    IntervalScheduled,

    /// The wait before an attempt was interrupted.
    ///
    /// Sets: `action`, `attempt` (upcoming attempt), `reason` (`abort`, `recover` or `absorbed`).
    WaitInterrupted,

    /// A success/failure hook or the recovery function panicked; the run continued.
    ///
    /// Sets: `action`, `attempt`, `reason` (`<hook>: <panic message>`).
    HookPanicked,

    // === Stop reasons ===
    /// The deadline window elapsed; no further attempt was made.
    ///
    /// Sets: `action`, `attempt` (the attempt that was skipped), `elapsed`.
    DeadlineExceeded,

    /// A failure did not match the retryable set.
    ///
    /// Sets: `action`, `attempt`, `reason`.
    NonRetryable,

    /// The action panicked; treated as a non-retryable failure.
    ///
    /// Sets: `action`, `attempt`, `reason` (panic message).
    ActionPanicked,

    /// The attempt limit was reached.
    ///
    /// Sets: `action`, `attempt` (last attempt).
    AttemptsExhausted,

    // === Terminal events ===
    /// An attempt succeeded and the result was delivered.
    ///
    /// Sets: `action`, `attempt`, `elapsed`.
    Succeeded,

    /// The result was completed with the recovery value.
    ///
    /// Sets: `action`, `attempt` (last attempt made), `elapsed`, `reason` (stop reason label).
    Recovered,

    /// The run stopped on interruption without completing the result.
    ///
    /// Sets: `action`, `attempt`, `elapsed`.
    RunAborted,

    // === Observer events ===
    /// A caller blocking on the result gave up after its timeout.
    ///
    /// Sets: `action`, `delay` (caller timeout).
    ObserveTimeout,

    /// A blocking wait was refused because it would stall a current-thread runtime.
    ///
    /// Sets: `action`, `reason`.
    ObserveRejected,

    /// The executor refused to accept the run.
    ///
    /// Sets: `action`, `reason`.
    ExecutorRejected,
}

impl EventKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::AttemptStarting => "attempt_starting",
            EventKind::AttemptFailed => "attempt_failed",
            EventKind::IntervalScheduled => "interval_scheduled",
            EventKind::WaitInterrupted => "wait_interrupted",
            EventKind::HookPanicked => "hook_panicked",
            EventKind::DeadlineExceeded => "deadline_exceeded",
            EventKind::NonRetryable => "non_retryable",
            EventKind::ActionPanicked => "action_panicked",
            EventKind::AttemptsExhausted => "attempts_exhausted",
            EventKind::Succeeded => "succeeded",
            EventKind::Recovered => "recovered",
            EventKind::RunAborted => "run_aborted",
            EventKind::ObserveTimeout => "observe_timeout",
            EventKind::ObserveRejected => "observe_rejected",
            EventKind::ExecutorRejected => "executor_rejected",
        }
    }
}

/// Run event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the action, if applicable.
    pub action: Option<Arc<str>>,
    /// Attempt number (starting from 1).
    pub attempt: Option<u32>,
    /// Wait or timeout associated with the event.
    pub delay: Option<Duration>,
    /// Time since the run started.
    pub elapsed: Option<Duration>,
    /// Human-readable reason (failure message, stop reason, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            action: None,
            attempt: None,
            delay: None,
            elapsed: None,
            reason: None,
        }
    }

    /// Attaches an action name.
    #[inline]
    pub fn with_action(mut self, action: impl Into<Arc<str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Attaches an attempt number.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a wait or timeout.
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay = Some(d);
        self
    }

    /// Attaches time since the run started.
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        self.elapsed = Some(d);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// True for events a caller should see at warn level.
    #[inline]
    pub fn is_warning(&self) -> bool {
        matches!(
            self.kind,
            EventKind::WaitInterrupted
                | EventKind::RunAborted
                | EventKind::ObserveTimeout
                | EventKind::ObserveRejected
                | EventKind::ExecutorRejected
                | EventKind::ActionPanicked
                | EventKind::HookPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::AttemptStarting);
        let b = Event::new(EventKind::AttemptFailed);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builders_fill_fields() {
        let ev = Event::new(EventKind::IntervalScheduled)
            .with_action("job")
            .with_attempt(2)
            .with_delay(Duration::from_millis(50))
            .with_elapsed(Duration::from_millis(7));
        assert_eq!(ev.action.as_deref(), Some("job"));
        assert_eq!(ev.attempt, Some(2));
        assert_eq!(ev.delay, Some(Duration::from_millis(50)));
        assert_eq!(ev.elapsed, Some(Duration::from_millis(7)));
        assert!(ev.reason.is_none());
    }

    #[test]
    fn warning_classification() {
        assert!(Event::new(EventKind::RunAborted).is_warning());
        assert!(Event::new(EventKind::ObserveTimeout).is_warning());
        assert!(!Event::new(EventKind::Succeeded).is_warning());
        assert!(Event::new(EventKind::ActionPanicked).is_warning());
        assert_eq!(EventKind::HookPanicked.as_label(), "hook_panicked");
        assert_eq!(EventKind::DeadlineExceeded.as_label(), "deadline_exceeded");
    }
}
