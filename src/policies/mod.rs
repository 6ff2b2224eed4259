//! # Retry policies.
//!
//! Policies that drive the engine's decisions between attempts.
//!
//! - [`IntervalStrategy`] how long to wait before the next attempt (fixed, random, exponential, custom).
//! - [`RetryOn`] which failure kinds permit another attempt ("is-a" matching over a declared taxonomy).
//!
//! ## Quick reference
//! | Policy             | Controls                         | Default                     |
//! |--------------------|----------------------------------|-----------------------------|
//! | [`IntervalStrategy`] | Delay before attempt `n > 1`   | `none()` (no delay)         |
//! | [`RetryOn`]        | Retry eligibility of a failure   | `any()` (every failure)     |

mod classify;
mod interval;

pub use classify::{Failure, FailureKind, Matcher, RetryOn, is_retryable};
pub use interval::{Interval, IntervalFn, IntervalStrategy, TimeUnit};
