//! # retryvisor
//!
//! **Retryvisor** is a policy-driven retry engine for Rust.
//!
//! It repeatedly invokes a fallible action until it succeeds or a stop condition is met
//! (attempt limit, deadline, non-retryable failure, interruption), then delivers either the
//! success value or a recovery value through a single-assignment [`ResultFuture`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   RetryBuilder ──build()──► Retry ──────────────────────┐
//!    (RetryConfig,             │ run / result_future /    │
//!     RetryOn, hooks,          │ result_blocking /        │
//!     executor, subscribers)   │ deferred / callable      │
//!                              ▼                          │
//!                     Executor::execute(run)              │
//!                 ┌────────────┴────────────┐             │
//!                 ▼                         ▼             │
//!          InlineExecutor             TokioExecutor       │
//!        (calling thread)         (runtime / shared pool) │
//!                 └────────────┬────────────┘             │
//!                              ▼                          │
//!   ┌─────────────────────── run loop ───────────────┐    │
//!   │ interval wait ─► deadline check ─► Action::call │    │
//!   │        ▲                              │         │    │
//!   │        └──── retryable failure ◄──────┤         │    │
//!   │                                       ▼         │    │
//!   │             success hook / failure hook          │    │
//!   └───────────────┬─────────────────────────────────┘    │
//!                   ▼                                      ▼
//!         ResultFuture::complete_once ──► wait_blocking / .await / try_value
//!                   │
//!                   └──► SubscriberSet ──► LogWriter (tracing), custom sinks
//! ```
//!
//! ### Stop conditions
//! ```text
//! success                → result = value
//! attempts exhausted     → result = recover(context)
//! deadline exceeded      → result = recover(context)
//! non-retryable failure  → result = recover(context)
//! action panicked        → result = recover(context)
//! interrupted (Recover)  → result = recover(context)
//! interrupted (Abandon)  → result stays pending; the next trigger starts over
//! ```
//!
//! ## Features
//! | Area               | Description                                              | Key types / traits                          |
//! |--------------------|----------------------------------------------------------|---------------------------------------------|
//! | **Engine**         | Configure and drive retries.                             | [`Retry`], [`RetryBuilder`], [`RetryConfig`] |
//! | **Actions**        | Define the retried operation.                            | [`Action`], [`ActionFn`], [`ActionRef`]     |
//! | **Classification** | Decide which failures may be retried.                    | [`Failure`], [`FailureKind`], [`RetryOn`]   |
//! | **Intervals**      | Wait between attempts.                                   | [`IntervalStrategy`], [`TimeUnit`]          |
//! | **Execution**      | Choose where runs execute.                               | [`Executor`], [`InlineExecutor`], [`TokioExecutor`] |
//! | **Results**        | Observe the outcome any number of times.                 | [`ResultFuture`]                            |
//! | **Diagnostics**    | Hook into run events.                                    | [`Subscribe`], [`Event`], [`LogWriter`]     |
//! | **Errors**         | Typed configuration and execution errors.                | [`ConfigError`], [`ExecutorError`], [`WrappedFailure`] |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::{IntervalStrategy, Retry, TimeUnit};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("flaky")]
//! struct Flaky;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! struct Transient;
//!
//! impl retryvisor::FailureKind for Transient {
//!     fn parent(&self) -> Option<Self> { None }
//! }
//!
//! impl retryvisor::Failure for Flaky {
//!     type Kind = Transient;
//!     fn kind(&self) -> Transient { Transient }
//! }
//!
//! let calls = std::sync::atomic::AtomicU32::new(0);
//! let calls = std::sync::Arc::new(calls);
//! let counter = calls.clone();
//!
//! let retry = Retry::of_fn(move || {
//!     let n = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
//!     if n < 2 { Err(Flaky) } else { Ok(n) }
//! })
//! .attempts(5)
//! .interval_in(IntervalStrategy::fixed(5), TimeUnit::Millis)
//! .deadline(Duration::from_secs(2))
//! .on_success(|v, _| println!("succeeded with {v}"))
//! .recover_value(0)
//! .build()
//! .unwrap();
//!
//! assert_eq!(retry.result_blocking(), Some(2));
//! ```

mod actions;
mod core;
mod error;
mod events;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use actions::{Action, ActionFn, ActionRef};
pub use core::{
    AttemptLimit, AttemptRecord, Executor, FailureHook, InlineExecutor, InterruptMode,
    MIN_DEADLINE, Policy, PolicySnapshot, RecoverFn, ResultFuture, Retry, RetryBuilder,
    RetryConfig, RunFuture, SuccessHook, TokioExecutor,
};
pub use error::{ConfigError, ExecutorError, ObserveError, WrappedFailure};
pub use events::{Event, EventKind};
pub use policies::{
    Failure, FailureKind, Interval, IntervalFn, IntervalStrategy, Matcher, RetryOn, TimeUnit,
    is_retryable,
};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
