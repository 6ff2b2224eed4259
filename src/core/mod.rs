//! Runtime core: policy, run loop and result delivery.
//!
//! The public entry point is [`Retry`], configured through [`RetryBuilder`].
//!
//! Internal modules:
//! - [`config`]: plain settings (attempt limit, deadline, interruption, interval);
//! - [`policy`]: the frozen policy, hooks and printable snapshot;
//! - [`builder`]: fluent configuration and validation;
//! - [`engine`]: the attempt loop and the trigger/observe API;
//! - [`future`]: single-assignment result shared by all observers;
//! - [`executor`]: where a run is driven (inline or on a tokio runtime);
//! - [`attempt`]: per-attempt bookkeeping.

mod attempt;
mod builder;
mod config;
mod engine;
mod executor;
mod future;
mod policy;

#[cfg(test)]
mod tests;

pub use attempt::AttemptRecord;
pub use builder::RetryBuilder;
pub use config::{AttemptLimit, InterruptMode, MIN_DEADLINE, RetryConfig};
pub use engine::Retry;
pub use executor::{Executor, InlineExecutor, RunFuture, TokioExecutor};
pub use future::ResultFuture;
pub use policy::{FailureHook, Policy, PolicySnapshot, RecoverFn, SuccessHook};
