//! # Fluent retry configuration.
//!
//! [`RetryBuilder`] accumulates options and validates them in [`RetryBuilder::build`].
//!
//! ## Defaults
//! | Option            | Default                                  |
//! |-------------------|------------------------------------------|
//! | attempts          | `Limited(0)` (one attempt)               |
//! | deadline          | 1s ([`MIN_DEADLINE`](crate::MIN_DEADLINE)) |
//! | interruptible     | `false`                                  |
//! | interval          | [`IntervalStrategy::none`]               |
//! | retry_on          | [`RetryOn::any`]                         |
//! | executor          | [`InlineExecutor`]                       |
//! | subscribers       | `[LogWriter]`                            |
//! | success hook      | no-op                                    |
//! | failure hook      | warn log                                 |
//! | recovery          | `None`                                   |

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::actions::{Action, ActionFn, ActionRef};
use crate::core::config::{AttemptLimit, InterruptMode, RetryConfig};
use crate::core::engine::Retry;
use crate::core::executor::{Executor, InlineExecutor, TokioExecutor};
use crate::core::policy::{
    FailureHook, Policy, PolicySnapshot, RecoverFn, SuccessHook, warn_on_failure,
};
use crate::error::{ConfigError, WrappedFailure};
use crate::policies::{Failure, IntervalStrategy, RetryOn, TimeUnit};
use crate::subscribers::{LogWriter, Subscribe, SubscriberSet};

enum ExecutorChoice {
    Inline,
    SharedPool,
    Custom(Arc<dyn Executor>),
}

/// Builder for [`Retry`] with fluent API.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use retryvisor::{IntervalStrategy, Retry, TimeUnit};
///
/// let retry = Retry::of_fn(|| "42".parse::<u32>().map_err(std::io::Error::other))
///     .attempts(3)
///     .interval_in(IntervalStrategy::fixed(10), TimeUnit::Millis)
///     .deadline(Duration::from_secs(5))
///     .recover_value(0)
///     .build()
///     .unwrap();
///
/// assert_eq!(retry.result_blocking(), Some(42));
/// ```
pub struct RetryBuilder<T, E: Failure, C = ()> {
    action: Option<ActionRef<T, E>>,
    config: RetryConfig,
    retry_on: RetryOn<E::Kind>,
    executor: ExecutorChoice,
    subscribers: Option<Vec<Arc<dyn Subscribe>>>,
    on_success: Option<SuccessHook<T, C>>,
    on_failure: Option<FailureHook<E>>,
    recover: Option<RecoverFn<T, C>>,
    context: Option<C>,
}

impl<T, E, C> Default for RetryBuilder<T, E, C>
where
    T: Clone + Send + Sync + 'static,
    E: Failure,
    C: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E, C> RetryBuilder<T, E, C>
where
    T: Clone + Send + Sync + 'static,
    E: Failure,
    C: Send + Sync + 'static,
{
    /// Creates an empty builder; an action must be set before [`build`](Self::build).
    pub fn new() -> Self {
        Self {
            action: None,
            config: RetryConfig::default(),
            retry_on: RetryOn::any(),
            executor: ExecutorChoice::Inline,
            subscribers: None,
            on_success: None,
            on_failure: None,
            recover: None,
            context: None,
        }
    }

    /// Sets the action.
    pub fn action(self, action: impl Action<T, E>) -> Self {
        self.action_ref(Arc::new(action))
    }

    /// Sets an already shared action.
    pub fn action_ref(mut self, action: ActionRef<T, E>) -> Self {
        self.action = Some(action);
        self
    }

    /// Sets an async closure as the action.
    pub fn action_fn<F, Fut>(self, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.action(ActionFn::new("action", f))
    }

    /// Replaces all plain settings at once.
    pub fn config(mut self, config: RetryConfig) -> Self {
        self.config = config;
        self
    }

    /// Attempt bound; `0` still makes one attempt.
    pub fn attempts(mut self, n: u32) -> Self {
        self.config.attempts = AttemptLimit::Limited(n);
        self
    }

    /// Removes the attempt bound.
    pub fn unlimited(mut self) -> Self {
        self.config.attempts = AttemptLimit::Unlimited;
        self
    }

    /// Stops the run when the wait between attempts is interrupted.
    pub fn interruptible(mut self) -> Self {
        self.config.interruptible = true;
        self
    }

    /// Chooses how an interruptible run stops (default [`InterruptMode::Abandon`]).
    pub fn on_interrupt(mut self, mode: InterruptMode) -> Self {
        self.config.on_interrupt = mode;
        self
    }

    /// Runs on a custom executor.
    pub fn executor(mut self, executor: impl Executor) -> Self {
        self.executor = ExecutorChoice::Custom(Arc::new(executor));
        self
    }

    /// Runs on the process-wide worker pool ([`TokioExecutor::shared`]).
    pub fn async_pool(mut self) -> Self {
        self.executor = ExecutorChoice::SharedPool;
        self
    }

    /// Wait strategy in the strategy's own unit.
    pub fn interval(mut self, interval: IntervalStrategy) -> Self {
        self.config.interval = interval;
        self
    }

    /// Wait strategy with its ticks interpreted in `unit`.
    pub fn interval_in(self, interval: IntervalStrategy, unit: TimeUnit) -> Self {
        self.interval(interval.format(unit))
    }

    /// Deadline window from run start (raised to at least 1s).
    pub fn deadline(mut self, window: Duration) -> Self {
        self.config.deadline = window;
        self
    }

    /// Deadline window given in `unit`.
    pub fn deadline_in(self, window: u64, unit: TimeUnit) -> Self {
        self.deadline(unit.to_duration(window))
    }

    /// Retries only failures whose kind is-a member of `kinds`; empty means any.
    pub fn retry_on(mut self, kinds: impl IntoIterator<Item = E::Kind>) -> Self {
        self.retry_on = RetryOn::kinds(kinds);
        self
    }

    /// Replaces the retryable set.
    pub fn retry_on_set(mut self, set: RetryOn<E::Kind>) -> Self {
        self.retry_on = set;
        self
    }

    /// Called once with the successful value.
    pub fn on_success<F>(mut self, hook: F) -> Self
    where
        F: Fn(&T, Option<&C>) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(hook));
        self
    }

    /// Called for every failed attempt.
    pub fn on_failure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&WrappedFailure<E>) + Send + Sync + 'static,
    {
        self.on_failure = Some(Arc::new(hook));
        self
    }

    /// Produces the fallback value when no attempt succeeds.
    pub fn recover<F>(mut self, recover: F) -> Self
    where
        F: Fn(Option<&C>) -> Option<T> + Send + Sync + 'static,
    {
        self.recover = Some(Arc::new(recover));
        self
    }

    /// Uses a constant fallback value.
    pub fn recover_value(self, value: T) -> Self {
        self.recover(move |_| Some(value.clone()))
    }

    /// Attaches the business context passed to the success hook and recovery.
    pub fn context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    /// Adds a diagnostic sink. The first call replaces the default [`LogWriter`].
    pub fn subscriber(mut self, sub: Arc<dyn Subscribe>) -> Self {
        self.subscribers.get_or_insert_with(Vec::new).push(sub);
        self
    }

    /// Replaces all diagnostic sinks; an empty list silences diagnostics.
    pub fn subscribers(mut self, subs: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = Some(subs);
        self
    }

    /// Validates the options and freezes them into a [`Retry`].
    ///
    /// ### Errors
    /// - [`ConfigError::MissingAction`] if no action was set
    /// - [`ConfigError::InvalidInterval`] / [`ConfigError::InvalidFactor`] for malformed intervals
    /// - [`ConfigError::Executor`] if the shared pool cannot start
    pub fn build(self) -> Result<Retry<T, E, C>, ConfigError> {
        let action = self.action.ok_or(ConfigError::MissingAction)?;
        self.config.interval.validate()?;

        let executor: Arc<dyn Executor> = match self.executor {
            ExecutorChoice::Inline => Arc::new(InlineExecutor),
            ExecutorChoice::SharedPool => Arc::new(TokioExecutor::shared()?),
            ExecutorChoice::Custom(e) => e,
        };
        let subscribers = SubscriberSet::new(
            self.subscribers
                .unwrap_or_else(|| vec![Arc::new(LogWriter::new()) as Arc<dyn Subscribe>]),
        );
        let config = self.config.normalized();

        let snapshot = Arc::new(PolicySnapshot {
            action: Arc::from(action.name()),
            attempts: config.attempts,
            deadline: config.deadline,
            interruptible: config.interruptible,
            on_interrupt: config.on_interrupt,
            interval: format!("{:?}/{:?}", config.interval.interval(), config.interval.unit()),
            retry_on: format!("{:?}", self.retry_on.matchers()),
            executor: executor.name(),
            has_context: self.context.is_some(),
        });

        let policy = Policy {
            config,
            retry_on: self.retry_on,
            executor,
            subscribers,
            on_success: self.on_success.unwrap_or_else(|| Arc::new(|_, _| {})),
            on_failure: self.on_failure.unwrap_or_else(warn_on_failure),
            recover: self.recover.unwrap_or_else(|| Arc::new(|_| None)),
            context: self.context,
            snapshot,
        };
        Ok(Retry::new(action, policy))
    }
}
