//! # Interval strategy between attempts.
//!
//! [`IntervalStrategy`] computes the wait before the next attempt. It pairs a raw
//! [`Interval`] (numbers of ticks) with a [`TimeUnit`] that gives the ticks meaning.
//! The default unit is milliseconds; [`IntervalStrategy::format`] rebinds it.
//!
//! Built-in shapes:
//! - [`Interval::None`] no wait at all;
//! - [`Interval::Fixed`] the same wait every time;
//! - [`Interval::Random`] uniform in `[low, high)`;
//! - [`Interval::Exponential`] `first × factor^(n-2)` for attempt `n`, capped at `max`;
//! - [`Interval::Custom`] caller-provided function of the attempt number.
//!
//! Strategies hold no mutable state, so one strategy can be shared by many runs.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::{IntervalStrategy, TimeUnit};
//!
//! let every_two_seconds = IntervalStrategy::fixed(2).format(TimeUnit::Seconds);
//! assert_eq!(every_two_seconds.next(2), Duration::from_secs(2));
//!
//! let jittered = IntervalStrategy::random(100, 200);
//! let d = jittered.next(2);
//! assert!(d >= Duration::from_millis(100) && d < Duration::from_millis(200));
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::error::ConfigError;

/// Caller-defined interval: attempt number → raw ticks (sign is ignored).
pub type IntervalFn = Arc<dyn Fn(u32) -> i64 + Send + Sync>;

/// Unit that converts raw interval ticks into a [`Duration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeUnit {
    Nanos,
    Micros,
    #[default]
    Millis,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Converts `ticks` of this unit into a duration, saturating on overflow.
    pub fn to_duration(self, ticks: u64) -> Duration {
        match self {
            TimeUnit::Nanos => Duration::from_nanos(ticks),
            TimeUnit::Micros => Duration::from_micros(ticks),
            TimeUnit::Millis => Duration::from_millis(ticks),
            TimeUnit::Seconds => Duration::from_secs(ticks),
            TimeUnit::Minutes => Duration::from_secs(ticks.saturating_mul(60)),
            TimeUnit::Hours => Duration::from_secs(ticks.saturating_mul(3_600)),
            TimeUnit::Days => Duration::from_secs(ticks.saturating_mul(86_400)),
        }
    }
}

/// Raw interval shape, measured in ticks of the owning strategy's unit.
#[derive(Clone)]
pub enum Interval {
    /// No wait.
    None,
    /// Constant wait.
    Fixed(u64),
    /// Uniform wait in `[low, high)`; `low` when the range is empty.
    Random { low: u64, high: u64 },
    /// Growing wait: `first` before the first retry, multiplied by `factor` afterwards.
    Exponential { first: u64, factor: f64, max: u64 },
    /// Caller-defined wait.
    Custom(IntervalFn),
}

impl fmt::Debug for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::None => f.write_str("None"),
            Interval::Fixed(n) => f.debug_tuple("Fixed").field(n).finish(),
            Interval::Random { low, high } => f
                .debug_struct("Random")
                .field("low", low)
                .field("high", high)
                .finish(),
            Interval::Exponential { first, factor, max } => f
                .debug_struct("Exponential")
                .field("first", first)
                .field("factor", factor)
                .field("max", max)
                .finish(),
            Interval::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Wait strategy between attempts.
#[derive(Clone, Debug)]
pub struct IntervalStrategy {
    interval: Interval,
    unit: TimeUnit,
}

impl Default for IntervalStrategy {
    /// Returns [`IntervalStrategy::none`].
    fn default() -> Self {
        Self::none()
    }
}

impl IntervalStrategy {
    /// Builds a strategy in milliseconds.
    pub fn new(interval: Interval) -> Self {
        Self {
            interval,
            unit: TimeUnit::Millis,
        }
    }

    /// No wait between attempts.
    pub fn none() -> Self {
        Self::new(Interval::None)
    }

    /// Constant wait of `ticks`.
    pub fn fixed(ticks: u64) -> Self {
        Self::new(Interval::Fixed(ticks))
    }

    /// Constant wait of exactly `delay`.
    pub fn fixed_duration(delay: Duration) -> Self {
        let nanos = delay.as_nanos().min(u128::from(u64::MAX)) as u64;
        Self::fixed(nanos).format(TimeUnit::Nanos)
    }

    /// Uniform wait in `[low, high)`.
    pub fn random(low: u64, high: u64) -> Self {
        Self::new(Interval::Random { low, high })
    }

    /// Uniform wait in `[0, bound)`.
    pub fn random_below(bound: u64) -> Self {
        Self::random(0, bound)
    }

    /// Exponentially growing wait capped at `max`.
    pub fn exponential(first: u64, factor: f64, max: u64) -> Self {
        Self::new(Interval::Exponential { first, factor, max })
    }

    /// Wait computed by `f(attempt)`; negative results are used by magnitude.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(u32) -> i64 + Send + Sync + 'static,
    {
        Self::new(Interval::Custom(Arc::new(f)))
    }

    /// Reinterprets the raw ticks in `unit`.
    #[must_use]
    pub fn format(mut self, unit: TimeUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Returns the raw interval shape.
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Returns the tick unit.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Raw ticks to wait before attempt number `attempt` (1-based).
    pub fn ticks(&self, attempt: u32) -> u64 {
        match &self.interval {
            Interval::None => 0,
            Interval::Fixed(n) => *n,
            Interval::Random { low, high } => {
                if low >= high {
                    return *low;
                }
                rand::rng().random_range(*low..*high)
            }
            Interval::Exponential { first, factor, max } => {
                exponential_ticks(*first, *factor, *max, attempt)
            }
            Interval::Custom(f) => f(attempt).unsigned_abs(),
        }
    }

    /// Wait before attempt number `attempt` (1-based).
    pub fn next(&self, attempt: u32) -> Duration {
        self.unit.to_duration(self.ticks(attempt))
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match self.interval {
            Interval::Random { low, high } if low > high => {
                Err(ConfigError::InvalidInterval { low, high })
            }
            Interval::Exponential { factor, .. } if !factor.is_finite() || factor <= 0.0 => {
                Err(ConfigError::InvalidFactor { factor })
            }
            _ => Ok(()),
        }
    }
}

/// `first × factor^(attempt-2)` clamped to `max`; attempt 2 is the first retry.
fn exponential_ticks(first: u64, factor: f64, max: u64, attempt: u32) -> u64 {
    let exp = attempt.saturating_sub(2).min(i32::MAX as u32) as i32;
    let unclamped = first as f64 * factor.powi(exp);

    if !unclamped.is_finite() || unclamped < 0.0 || unclamped > max as f64 {
        max
    } else {
        unclamped as u64
    }
}
