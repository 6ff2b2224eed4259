//! # Frozen retry policy.
//!
//! [`Policy`] is everything a run consults: the normalized [`RetryConfig`], the retryable
//! set, the executor, hooks, recovery and the business context. It is produced by
//! [`RetryBuilder::build`](crate::RetryBuilder::build) and never changes afterwards.
//!
//! [`PolicySnapshot`] is the printable part of a policy, attached to every
//! [`WrappedFailure`] for diagnostics.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::{AttemptLimit, InterruptMode, RetryConfig};
use crate::core::executor::Executor;
use crate::error::WrappedFailure;
use crate::policies::{Failure, IntervalStrategy, RetryOn};
use crate::subscribers::SubscriberSet;

/// Called once with the successful value and the business context.
pub type SuccessHook<T, C> = Arc<dyn Fn(&T, Option<&C>) + Send + Sync>;

/// Called once per failed attempt.
pub type FailureHook<E> = Arc<dyn Fn(&WrappedFailure<E>) + Send + Sync>;

/// Produces the fallback value when no attempt succeeds.
pub type RecoverFn<T, C> = Arc<dyn Fn(Option<&C>) -> Option<T> + Send + Sync>;

/// Default failure hook: logs the failure at warn level.
pub(crate) fn warn_on_failure<E: Failure>() -> FailureHook<E> {
    Arc::new(|wrapped: &WrappedFailure<E>| {
        tracing::warn!(
            target: "retryvisor",
            action = %wrapped.policy().action,
            attempt = wrapped.attempt().index(),
            err = %wrapped.failure(),
            "retry attempt failed"
        );
    })
}

/// Printable summary of a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySnapshot {
    /// Action name.
    pub action: Arc<str>,
    /// Attempt bound.
    pub attempts: AttemptLimit,
    /// Effective deadline window.
    pub deadline: Duration,
    /// Whether interruption stops the run.
    pub interruptible: bool,
    /// Handling of an interruption.
    pub on_interrupt: InterruptMode,
    /// Interval strategy, rendered.
    pub interval: String,
    /// Retryable set, rendered.
    pub retry_on: String,
    /// Executor name.
    pub executor: &'static str,
    /// Whether a business context is attached.
    pub has_context: bool,
}

impl fmt::Display for PolicySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RetryPolicy{{action={}, attempts={:?}, deadline={:?}, interruptible={}, on_interrupt={:?}, interval={}, retry_on={}, executor={}}}",
            self.action,
            self.attempts,
            self.deadline,
            self.interruptible,
            self.on_interrupt,
            self.interval,
            self.retry_on,
            self.executor,
        )
    }
}

/// Immutable policy governing every run of one [`Retry`](crate::Retry).
pub struct Policy<T, E: Failure, C> {
    pub(crate) config: RetryConfig,
    pub(crate) retry_on: RetryOn<E::Kind>,
    pub(crate) executor: Arc<dyn Executor>,
    pub(crate) subscribers: SubscriberSet,
    pub(crate) on_success: SuccessHook<T, C>,
    pub(crate) on_failure: FailureHook<E>,
    pub(crate) recover: RecoverFn<T, C>,
    pub(crate) context: Option<C>,
    pub(crate) snapshot: Arc<PolicySnapshot>,
}

impl<T, E: Failure, C> Policy<T, E, C> {
    /// Attempt bound.
    pub fn attempts(&self) -> AttemptLimit {
        self.config.attempts
    }

    /// True if another attempt may start after `made` attempts.
    #[inline]
    pub fn can_retry(&self, made: u32) -> bool {
        self.config.attempts.can_retry(made)
    }

    /// Effective deadline window (already clamped).
    pub fn deadline(&self) -> Duration {
        self.config.deadline
    }

    /// Whether an interruption during the wait stops the run.
    pub fn is_interruptible(&self) -> bool {
        self.config.interruptible
    }

    /// How an interruptible run stops.
    pub fn on_interrupt(&self) -> InterruptMode {
        self.config.on_interrupt
    }

    /// Wait strategy between attempts.
    pub fn interval(&self) -> &IntervalStrategy {
        &self.config.interval
    }

    /// Full configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Retryable set.
    pub fn retry_on(&self) -> &RetryOn<E::Kind> {
        &self.retry_on
    }

    /// True if `failure` permits another attempt.
    pub fn is_retryable(&self, failure: &E) -> bool {
        crate::policies::is_retryable(failure, &self.retry_on)
    }

    /// Executor runs are submitted to.
    pub fn executor(&self) -> &dyn Executor {
        self.executor.as_ref()
    }

    /// Diagnostic sinks.
    pub fn subscribers(&self) -> &SubscriberSet {
        &self.subscribers
    }

    /// Business context, if attached.
    pub fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }

    /// Printable summary.
    pub fn snapshot(&self) -> &Arc<PolicySnapshot> {
        &self.snapshot
    }

    pub(crate) fn recover(&self) -> Option<T> {
        (self.recover)(self.context.as_ref())
    }
}

impl<T, E: Failure, C> fmt::Debug for Policy<T, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Policy").field(&self.snapshot).finish()
    }
}
