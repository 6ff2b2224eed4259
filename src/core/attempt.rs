//! # Attempt bookkeeping.
//!
//! [`AttemptRecord`] describes one invocation of the action inside a run. Records are
//! created right before the deadline check and dropped at the end of the iteration
//! (or moved into a [`WrappedFailure`](crate::WrappedFailure) on failure).

use std::time::Duration;

use tokio::time::Instant;

/// One attempt within a run.
#[derive(Debug, Clone, Copy)]
pub struct AttemptRecord {
    index: u32,
    started: Instant,
    offset: Duration,
}

impl AttemptRecord {
    pub(crate) fn begin(index: u32, run_start: Instant) -> Self {
        let started = Instant::now();
        Self {
            index,
            started,
            offset: started.saturating_duration_since(run_start),
        }
    }

    /// Attempt number, starting from 1.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// When the attempt began.
    pub fn started(&self) -> Instant {
        self.started
    }

    /// Time between the start of the run and the start of this attempt.
    pub fn offset(&self) -> Duration {
        self.offset
    }
}
