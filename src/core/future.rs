//! # Single-assignment result.
//!
//! [`ResultFuture`] is completed at most once and read any number of times. The value is
//! an `Option<T>`: `Some` for a success (or a recovery that produced a value), `None` for a
//! recovery that produced nothing.
//!
//! ## Access modes
//! ```text
//!               complete_once(v) ──► [Pending → Completed(v)]
//!                                          │
//!        ┌─────────────────────────────────┼──────────────────────────┐
//!        ▼                                 ▼                          ▼
//!  wait_blocking(timeout)            wait().await / .await         try_value()
//!  (Condvar; caller thread)          (Notify; any runtime task)    (non-blocking)
//! ```
//!
//! ## Rules
//! - The first `complete_once` wins; later calls return `false` and change nothing.
//! - Every observer sees the same value.
//! - A blocking timeout only ends the caller's wait; it never touches the run.

use std::future::IntoFuture;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::Notify;

use crate::error::ObserveError;

enum State<T> {
    Pending,
    Completed(Option<T>),
}

struct Shared<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
    notify: Notify,
}

/// Handle to a result that is completed exactly once.
pub struct ResultFuture<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for ResultFuture<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for ResultFuture<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> ResultFuture<T> {
    /// Creates a pending result.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::Pending),
                ready: Condvar::new(),
                notify: Notify::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Completes the result if still pending. Returns `true` if this call completed it.
    pub fn complete_once(&self, value: Option<T>) -> bool {
        {
            let mut state = self.lock();
            if matches!(*state, State::Completed(_)) {
                return false;
            }
            *state = State::Completed(value);
        }
        self.shared.ready.notify_all();
        self.shared.notify.notify_waiters();
        true
    }

    /// True once a value has been set.
    pub fn is_completed(&self) -> bool {
        matches!(*self.lock(), State::Completed(_))
    }

    /// The value, if completed; `None` while pending.
    pub fn try_value(&self) -> Option<Option<T>> {
        match &*self.lock() {
            State::Pending => None,
            State::Completed(v) => Some(v.clone()),
        }
    }

    /// Blocks the calling thread until completion or `timeout`.
    ///
    /// Must not be called from an async task; use [`wait`](Self::wait) there.
    pub fn wait_blocking(&self, timeout: Option<Duration>) -> Result<Option<T>, ObserveError> {
        let pending = |s: &mut State<T>| matches!(s, State::Pending);
        let guard = self.lock();
        let guard = match timeout {
            None => self
                .shared
                .ready
                .wait_while(guard, pending)
                .unwrap_or_else(PoisonError::into_inner),
            Some(timeout) => {
                let (guard, res) = self
                    .shared
                    .ready
                    .wait_timeout_while(guard, timeout, pending)
                    .unwrap_or_else(PoisonError::into_inner);
                if res.timed_out() && matches!(*guard, State::Pending) {
                    return Err(ObserveError::Timeout { timeout });
                }
                guard
            }
        };
        match &*guard {
            State::Completed(v) => Ok(v.clone()),
            State::Pending => Ok(None),
        }
    }

    /// Waits asynchronously for completion.
    pub async fn wait(&self) -> Option<T> {
        loop {
            let notified = self.shared.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(value) = self.try_value() {
                return value;
            }
            notified.await;
        }
    }
}

impl<T: Clone + Send + Sync + 'static> IntoFuture for ResultFuture<T> {
    type Output = Option<T>;
    type IntoFuture = BoxFuture<'static, Option<T>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.wait().await })
    }
}

impl<T> std::fmt::Debug for ResultFuture<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let completed = self
            .shared
            .state
            .lock()
            .map(|s| matches!(*s, State::Completed(_)))
            .unwrap_or(false);
        f.debug_struct("ResultFuture")
            .field("completed", &completed)
            .finish()
    }
}
