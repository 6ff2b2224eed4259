//! Error types used by the retry engine.
//!
//! - [`ConfigError`]: raised by [`RetryBuilder::build`](crate::RetryBuilder::build); the only
//!   error a caller ever receives directly.
//! - [`ExecutorError`]: an [`Executor`](crate::Executor) refused a run.
//! - [`ObserveError`]: a caller waiting on a [`ResultFuture`](crate::ResultFuture) gave up.
//! - [`WrappedFailure`]: an action failure paired with the policy snapshot, handed to the
//!   failure hook.
//!
//! Runtime problems never escape the engine: action failures go to hooks, executor and
//! observation problems are logged and turned into an absent result.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::core::{AttemptRecord, PolicySnapshot};

/// # Errors produced while building a retry policy.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No action was supplied to the builder.
    #[error("retry action is not set")]
    MissingAction,

    /// Random interval with `low > high`.
    #[error("invalid random interval: low {low} exceeds high {high}")]
    InvalidInterval {
        /// Lower bound (inclusive).
        low: u64,
        /// Upper bound (exclusive).
        high: u64,
    },

    /// Exponential interval with a non-finite or non-positive factor.
    #[error("invalid exponential interval factor {factor}")]
    InvalidFactor {
        /// The rejected factor.
        factor: f64,
    },

    /// The shared worker pool could not be started.
    #[error("executor unavailable: {0}")]
    Executor(#[from] ExecutorError),
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retryvisor::ConfigError;
    ///
    /// assert_eq!(ConfigError::MissingAction.as_label(), "config_missing_action");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::MissingAction => "config_missing_action",
            ConfigError::InvalidInterval { .. } => "config_invalid_interval",
            ConfigError::InvalidFactor { .. } => "config_invalid_factor",
            ConfigError::Executor(_) => "config_executor",
        }
    }
}

/// # Errors produced when submitting a run.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    /// No tokio runtime is reachable from the calling thread.
    #[error("no tokio runtime available: {reason}")]
    NoRuntime {
        /// Why the runtime lookup failed.
        reason: String,
    },

    /// Inline execution was requested from inside a current-thread runtime.
    #[error("inline executor cannot block inside a current-thread runtime")]
    NestedRuntime,

    /// A runtime for the run could not be constructed.
    #[error("failed to build runtime: {reason}")]
    Build {
        /// The I/O error reported by the runtime builder.
        reason: String,
    },
}

impl ExecutorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ExecutorError::NoRuntime { .. } => "executor_no_runtime",
            ExecutorError::NestedRuntime => "executor_nested_runtime",
            ExecutorError::Build { .. } => "executor_build",
        }
    }
}

/// # Errors seen by a caller waiting for a result.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObserveError {
    /// The caller's wait elapsed before the run completed. The run keeps going.
    #[error("timed out after {timeout:?} waiting for result")]
    Timeout {
        /// The caller-side timeout.
        timeout: Duration,
    },

    /// The run could not be submitted.
    #[error("run was not submitted: {0}")]
    Rejected(#[from] ExecutorError),

    /// A blocking wait was attempted on a current-thread runtime, which would never wake.
    #[error("blocking wait inside a current-thread runtime; await the result instead")]
    CurrentThreadRuntime,
}

impl ObserveError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ObserveError::Timeout { .. } => "observe_timeout",
            ObserveError::Rejected(_) => "observe_rejected",
            ObserveError::CurrentThreadRuntime => "observe_current_thread",
        }
    }
}

/// An action failure together with the attempt and policy it happened under.
///
/// Delivered to the failure hook once per failed attempt; never returned to the caller.
pub struct WrappedFailure<E> {
    failure: E,
    attempt: AttemptRecord,
    policy: Arc<PolicySnapshot>,
}

impl<E> WrappedFailure<E> {
    pub(crate) fn new(failure: E, attempt: AttemptRecord, policy: Arc<PolicySnapshot>) -> Self {
        Self {
            failure,
            attempt,
            policy,
        }
    }

    /// The original failure.
    pub fn failure(&self) -> &E {
        &self.failure
    }

    /// The attempt that failed.
    pub fn attempt(&self) -> &AttemptRecord {
        &self.attempt
    }

    /// Snapshot of the policy governing the run.
    pub fn policy(&self) -> &PolicySnapshot {
        &self.policy
    }

    /// Unwraps the original failure.
    pub fn into_failure(self) -> E {
        self.failure
    }
}

impl<E: fmt::Debug> fmt::Debug for WrappedFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappedFailure")
            .field("failure", &self.failure)
            .field("attempt", &self.attempt)
            .field("policy", &self.policy)
            .finish()
    }
}

impl<E: fmt::Display> fmt::Display for WrappedFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attempt {} failed: {}\n retry policy: {}",
            self.attempt.index(),
            self.failure,
            self.policy
        )
    }
}

impl<E: StdError + 'static> StdError for WrappedFailure<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.failure)
    }
}
