//! # Retry: drives one action under one policy.
//!
//! A [`Retry`] owns an action, a frozen [`Policy`] and a single-assignment
//! [`ResultFuture`]. Triggering it submits a run to the policy's executor.
//!
//! ## Event flow
//! ```text
//! trigger ──► Executor::execute(run)
//!
//! loop while can_retry(attempt) {
//!   ├─► future already completed?      → stop
//!   ├─► attempt += 1
//!   ├─► not first attempt:
//!   │     ├─► publish IntervalScheduled
//!   │     └─► sleep(interval) ◄── interrupt()
//!   │            ├─► not interruptible → WaitInterrupted(absorbed), keep going
//!   │            ├─► Abandon           → RunAborted, return (result stays pending)
//!   │            └─► Recover           → stop
//!   ├─► elapsed >= deadline?           → DeadlineExceeded, stop
//!   ├─► publish AttemptStarting, call action
//!   │     ├─► Ok(v)   → success hook, complete(v), Succeeded, return
//!   │     ├─► Err(e)  → AttemptFailed, failure hook
//!   │     │              └─► not retryable → NonRetryable, stop
//!   │     └─► panic   → ActionPanicked, stop
//! }
//! stop: result still pending → complete(recover(context)), Recovered
//! ```
//!
//! ## Rules
//! - At most one run drives a [`Retry`] at a time; a trigger while a run is in flight is a no-op.
//! - The success hook runs **before** the result becomes observable.
//! - Once the result is completed, later triggers make no attempt.
//! - An abandoned run leaves the result pending; the next trigger starts over.
//! - Panics in the action, hooks or recovery are contained; a panicking recovery completes
//!   the result with `None`.

use std::fmt;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::actions::{ActionFn, ActionRef};
use crate::core::attempt::AttemptRecord;
use crate::core::builder::RetryBuilder;
use crate::core::config::InterruptMode;
use crate::core::future::ResultFuture;
use crate::core::policy::Policy;
use crate::error::{ExecutorError, ObserveError, WrappedFailure};
use crate::events::{Event, EventKind};
use crate::policies::Failure;
use crate::subscribers::panic_message;

/// Why the attempt loop stopped without a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Exhausted,
    Deadline,
    NonRetryable,
    Panicked,
    Interrupted,
    Completed,
}

impl Stop {
    fn as_label(&self) -> &'static str {
        match self {
            Stop::Exhausted => "attempts_exhausted",
            Stop::Deadline => "deadline_exceeded",
            Stop::NonRetryable => "non_retryable",
            Stop::Panicked => "action_panicked",
            Stop::Interrupted => "interrupted",
            Stop::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pause {
    Elapsed,
    Interrupted,
}

/// Clears the in-flight flag when the run ends, however it ends.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct Inner<T, E: Failure, C> {
    action: ActionRef<T, E>,
    policy: Policy<T, E, C>,
    future: ResultFuture<T>,
    running: AtomicBool,
    interrupt: Mutex<CancellationToken>,
}

impl<T, E, C> Inner<T, E, C>
where
    T: Clone + Send + Sync + 'static,
    E: Failure,
    C: Send + Sync + 'static,
{
    fn event(&self, kind: EventKind) -> Event {
        Event::new(kind).with_action(Arc::clone(&self.policy.snapshot.action))
    }

    fn emit(&self, event: Event) {
        self.policy.subscribers.emit(&event);
    }

    /// Runs a user hook, reporting a panic as [`EventKind::HookPanicked`].
    fn contain<R>(&self, hook: &str, attempt: u32, f: impl FnOnce() -> R) -> Option<R> {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(out) => Some(out),
            Err(payload) => {
                self.emit(
                    self.event(EventKind::HookPanicked)
                        .with_attempt(attempt)
                        .with_reason(format!("{hook}: {}", panic_message(payload.as_ref()))),
                );
                None
            }
        }
    }

    fn token(&self) -> CancellationToken {
        self.interrupt
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn reset_token(&self) {
        *self.interrupt.lock().unwrap_or_else(PoisonError::into_inner) = CancellationToken::new();
    }

    async fn run(self: Arc<Self>) {
        let Some(_running) = RunGuard::acquire(&self.running) else {
            return;
        };
        let policy = &self.policy;
        let token = self.token();
        let start = time::Instant::now();

        let mut attempt: u32 = 0;
        let mut first = true;
        let mut listen = true;
        let mut stop = Stop::Exhausted;

        while policy.can_retry(attempt) {
            if self.future.is_completed() {
                stop = Stop::Completed;
                break;
            }
            attempt = attempt.checked_add(1).unwrap_or(1);

            if !first {
                let delay = policy.interval().next(attempt);
                self.emit(
                    self.event(EventKind::IntervalScheduled)
                        .with_attempt(attempt)
                        .with_delay(delay),
                );
                if pause(delay, &token, listen).await == Pause::Interrupted {
                    if !policy.is_interruptible() {
                        self.emit(
                            self.event(EventKind::WaitInterrupted)
                                .with_attempt(attempt)
                                .with_reason("absorbed"),
                        );
                        listen = false;
                    } else if policy.on_interrupt() == InterruptMode::Recover {
                        self.emit(
                            self.event(EventKind::WaitInterrupted)
                                .with_attempt(attempt)
                                .with_reason("recover"),
                        );
                        stop = Stop::Interrupted;
                        break;
                    } else {
                        self.emit(
                            self.event(EventKind::WaitInterrupted)
                                .with_attempt(attempt)
                                .with_reason("abort"),
                        );
                        self.emit(
                            self.event(EventKind::RunAborted)
                                .with_attempt(attempt)
                                .with_elapsed(start.elapsed()),
                        );
                        self.reset_token();
                        return;
                    }
                }
            }
            first = false;

            let record = AttemptRecord::begin(attempt, start);
            if record.offset() >= policy.deadline() {
                self.emit(
                    self.event(EventKind::DeadlineExceeded)
                        .with_attempt(attempt)
                        .with_elapsed(record.offset()),
                );
                stop = Stop::Deadline;
                break;
            }

            self.emit(
                self.event(EventKind::AttemptStarting)
                    .with_attempt(attempt)
                    .with_elapsed(record.offset()),
            );
            let outcome = match AssertUnwindSafe(self.action.call()).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(payload) => {
                    self.emit(
                        self.event(EventKind::ActionPanicked)
                            .with_attempt(attempt)
                            .with_reason(panic_message(payload.as_ref())),
                    );
                    stop = Stop::Panicked;
                    break;
                }
            };
            match outcome {
                Ok(value) => {
                    self.contain("on_success", attempt, || {
                        (policy.on_success)(&value, policy.context())
                    });
                    if self.future.complete_once(Some(value)) {
                        self.emit(
                            self.event(EventKind::Succeeded)
                                .with_attempt(attempt)
                                .with_elapsed(start.elapsed()),
                        );
                    }
                    return;
                }
                Err(failure) => {
                    let wrapped =
                        WrappedFailure::new(failure, record, Arc::clone(policy.snapshot()));
                    self.emit(
                        self.event(EventKind::AttemptFailed)
                            .with_attempt(attempt)
                            .with_reason(wrapped.failure().to_string()),
                    );
                    self.contain("on_failure", attempt, || (policy.on_failure)(&wrapped));

                    if !policy.is_retryable(wrapped.failure()) {
                        self.emit(
                            self.event(EventKind::NonRetryable)
                                .with_attempt(attempt)
                                .with_reason(format!("{:?}", wrapped.failure().kind())),
                        );
                        stop = Stop::NonRetryable;
                        break;
                    }
                }
            }
        }

        if stop == Stop::Exhausted {
            self.emit(self.event(EventKind::AttemptsExhausted).with_attempt(attempt));
        }
        if self.future.is_completed() {
            return;
        }
        let fallback = self.contain("recover", attempt, || policy.recover()).flatten();
        if self.future.complete_once(fallback) {
            self.emit(
                self.event(EventKind::Recovered)
                    .with_attempt(attempt)
                    .with_elapsed(start.elapsed())
                    .with_reason(stop.as_label()),
            );
        }
    }
}

/// A blocking wait on a current-thread runtime would park its only worker.
fn blocking_allowed() -> Result<(), ObserveError> {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::CurrentThread => {
            Err(ObserveError::CurrentThreadRuntime)
        }
        _ => Ok(()),
    }
}

/// Sleeps for `delay`, returning early if `token` fires while `listen` is set.
async fn pause(delay: Duration, token: &CancellationToken, listen: bool) -> Pause {
    if !listen {
        time::sleep(delay).await;
        return Pause::Elapsed;
    }
    if delay.is_zero() {
        return if token.is_cancelled() {
            Pause::Interrupted
        } else {
            Pause::Elapsed
        };
    }
    select! {
        biased;
        _ = token.cancelled() => Pause::Interrupted,
        _ = time::sleep(delay) => Pause::Elapsed,
    }
}

/// A retriable action bound to its policy and result.
///
/// Cloning is cheap and every clone shares the same run state and result.
///
/// # Example
/// ```rust
/// use retryvisor::Retry;
///
/// let retry = Retry::of(|| async { Ok::<_, std::io::Error>("pong") })
///     .attempts(2)
///     .build()
///     .unwrap();
///
/// assert_eq!(retry.result_blocking(), Some("pong"));
/// ```
pub struct Retry<T, E: Failure, C = ()> {
    inner: Arc<Inner<T, E, C>>,
}

impl<T, E: Failure, C> Clone for Retry<T, E, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E: Failure, C> fmt::Debug for Retry<T, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("policy", &self.inner.policy)
            .field("running", &self.inner.running.load(Ordering::Acquire))
            .field("future", &self.inner.future)
            .finish()
    }
}

impl<T, E> Retry<T, E, ()>
where
    T: Clone + Send + Sync + 'static,
    E: Failure,
{
    /// Empty builder.
    pub fn builder() -> RetryBuilder<T, E, ()> {
        RetryBuilder::new()
    }

    /// Builder for an async closure.
    pub fn of<F, Fut>(action: F) -> RetryBuilder<T, E, ()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        RetryBuilder::new().action_fn(action)
    }

    /// Builder for a synchronous closure.
    pub fn of_fn<F>(action: F) -> RetryBuilder<T, E, ()>
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        let action = Arc::new(action);
        RetryBuilder::new().action_fn(move || {
            let action = Arc::clone(&action);
            async move { (*action)() }
        })
    }
}

impl<T, E, C> Retry<T, E, C>
where
    T: Clone + Send + Sync + 'static,
    E: Failure,
    C: Send + Sync + 'static,
{
    /// Builder for an async closure with a business context.
    pub fn with_context<F, Fut>(action: F, context: C) -> RetryBuilder<T, E, C>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        RetryBuilder::new()
            .action(ActionFn::new("action", action))
            .context(context)
    }

    pub(crate) fn new(action: ActionRef<T, E>, policy: Policy<T, E, C>) -> Self {
        Self {
            inner: Arc::new(Inner {
                action,
                policy,
                future: ResultFuture::new(),
                running: AtomicBool::new(false),
                interrupt: Mutex::new(CancellationToken::new()),
            }),
        }
    }

    fn trigger(&self) -> Result<(), ExecutorError> {
        let run = Arc::clone(&self.inner).run();
        let res = self.inner.policy.executor.execute(Box::pin(run));
        if let Err(err) = &res {
            self.inner.emit(
                self.inner
                    .event(EventKind::ExecutorRejected)
                    .with_reason(err.to_string()),
            );
        }
        res
    }

    /// Submits a run and returns without waiting.
    ///
    /// With the inline executor the run has finished when this returns.
    pub fn run(&self) {
        let _ = self.trigger();
    }

    /// Submits a run and returns the shared result.
    pub fn result_future(&self) -> ResultFuture<T> {
        let _ = self.trigger();
        self.future()
    }

    /// The shared result, without submitting a run.
    pub fn future(&self) -> ResultFuture<T> {
        self.inner.future.clone()
    }

    /// Submits a run and blocks until the result is available.
    ///
    /// Returns `None` when recovery produced nothing or the run could not be submitted.
    /// Must not be called from inside an async task; on a current-thread runtime the wait
    /// is refused (nothing is submitted) and `None` is returned.
    pub fn result_blocking(&self) -> Option<T> {
        self.observe(None)
    }

    /// Like [`result_blocking`](Self::result_blocking), giving up after `timeout`.
    ///
    /// A timeout ends only the caller's wait; the run continues and completes the result.
    pub fn result_blocking_timeout(&self, timeout: Duration) -> Option<T> {
        self.observe(Some(timeout))
    }

    fn observe(&self, timeout: Option<Duration>) -> Option<T> {
        let outcome = blocking_allowed()
            .and_then(|()| self.trigger().map_err(ObserveError::from))
            .and_then(|()| self.inner.future.wait_blocking(timeout));
        match outcome {
            Ok(value) => value,
            Err(ObserveError::Timeout { timeout }) => {
                self.inner
                    .emit(self.inner.event(EventKind::ObserveTimeout).with_delay(timeout));
                None
            }
            Err(err @ ObserveError::CurrentThreadRuntime) => {
                self.inner.emit(
                    self.inner
                        .event(EventKind::ObserveRejected)
                        .with_reason(err.to_string()),
                );
                None
            }
            Err(_) => None,
        }
    }

    /// A future that submits a run when first polled and resolves with the result.
    pub fn deferred(&self) -> impl Future<Output = Option<T>> + Send + 'static {
        let this = self.clone();
        async move {
            match this.trigger() {
                Ok(()) => this.inner.future.wait().await,
                Err(_) => this.inner.future.try_value().flatten(),
            }
        }
    }

    /// Deferred blocking form: submits and waits when called.
    pub fn callable(&self) -> impl FnOnce() -> Option<T> + Send + 'static {
        let this = self.clone();
        move || this.result_blocking()
    }

    /// Deferred fire-and-forget form: submits when called.
    pub fn runnable(&self) -> impl FnOnce() + Send + 'static {
        let this = self.clone();
        move || this.run()
    }

    /// Interrupts the wait between attempts of the current run.
    ///
    /// Handling depends on the policy: absorbed when not interruptible, otherwise the run
    /// is abandoned or recovers per [`InterruptMode`]. Has no effect on an attempt in progress.
    pub fn interrupt(&self) {
        self.inner.token().cancel();
    }

    /// True while a run is in flight.
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    /// Frozen policy.
    pub fn policy(&self) -> &Policy<T, E, C> {
        &self.inner.policy
    }

    /// Action name.
    pub fn name(&self) -> &str {
        self.inner.action.name()
    }
}
