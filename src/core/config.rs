//! # Retry configuration.
//!
//! Provides [`RetryConfig`], the plain-data part of a retry policy. The builder
//! ([`RetryBuilder`](crate::RetryBuilder)) fills one in and freezes it at `build()`.
//!
//! ## Sentinel values
//! - `attempts = Limited(0)` → exactly one attempt (zero retries still tries once)
//! - `deadline < 1s` → clamped up to [`MIN_DEADLINE`]

use std::time::Duration;

use crate::policies::IntervalStrategy;

/// Smallest deadline window a policy accepts; shorter requests are raised to it.
pub const MIN_DEADLINE: Duration = Duration::from_millis(1000);

/// Bound on the number of attempts in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptLimit {
    /// At most `max(n, 1)` attempts.
    Limited(u32),
    /// No bound; the deadline window or a success ends the run.
    Unlimited,
}

impl Default for AttemptLimit {
    fn default() -> Self {
        AttemptLimit::Limited(0)
    }
}

impl From<u32> for AttemptLimit {
    fn from(n: u32) -> Self {
        AttemptLimit::Limited(n)
    }
}

impl AttemptLimit {
    /// True if another attempt may start after `made` attempts.
    ///
    /// # Example
    /// ```
    /// use retryvisor::AttemptLimit;
    ///
    /// assert!(AttemptLimit::Limited(0).can_retry(0));
    /// assert!(!AttemptLimit::Limited(0).can_retry(1));
    /// assert!(AttemptLimit::Limited(3).can_retry(2));
    /// assert!(AttemptLimit::Unlimited.can_retry(u32::MAX));
    /// ```
    #[inline]
    pub fn can_retry(&self, made: u32) -> bool {
        match self {
            AttemptLimit::Unlimited => true,
            AttemptLimit::Limited(n) => made < (*n).max(1),
        }
    }

    /// Number of attempts a run may make, `None` when unlimited.
    #[inline]
    pub fn max_attempts(&self) -> Option<u32> {
        match self {
            AttemptLimit::Unlimited => None,
            AttemptLimit::Limited(n) => Some((*n).max(1)),
        }
    }
}

/// What an interruptible run does when its wait is interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterruptMode {
    /// Stop the run and leave the result pending.
    ///
    /// A caller blocking without a timeout will wait forever. Kept as the
    /// default for compatibility; prefer [`InterruptMode::Recover`].
    #[default]
    Abandon,
    /// Stop the run and complete the result with the recovery value.
    Recover,
}

/// Plain retry settings.
///
/// ## Field semantics
/// - `attempts`: attempt bound (`Limited(0)` still makes one attempt)
/// - `deadline`: wall-clock window from run start; checked before each attempt
/// - `interruptible`: whether an interruption during the wait stops the run
/// - `on_interrupt`: how an interruptible run stops
/// - `interval`: wait before every attempt but the first
#[derive(Clone, Debug, Default)]
pub struct RetryConfig {
    /// Attempt bound.
    pub attempts: AttemptLimit,

    /// Deadline window (`< 1s` is raised to [`MIN_DEADLINE`]).
    pub deadline: Duration,

    /// Stop the run when the wait is interrupted.
    ///
    /// When `false` an interruption only cuts the current wait short.
    pub interruptible: bool,

    /// Handling of an interruption when `interruptible` is set.
    pub on_interrupt: InterruptMode,

    /// Wait between attempts.
    pub interval: IntervalStrategy,
}

impl RetryConfig {
    /// Returns the deadline raised to at least [`MIN_DEADLINE`].
    #[inline]
    pub fn deadline_clamped(&self) -> Duration {
        self.deadline.max(MIN_DEADLINE)
    }

    /// Returns a copy with sentinels normalized.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.deadline = self.deadline_clamped();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limit_allows_exactly_one_attempt() {
        let limit = AttemptLimit::Limited(0);
        assert!(limit.can_retry(0));
        assert!(!limit.can_retry(1));
        assert_eq!(limit.max_attempts(), Some(1));
    }

    #[test]
    fn limited_counts_attempts() {
        let limit = AttemptLimit::from(4);
        let allowed = (0..10).filter(|made| limit.can_retry(*made)).count();
        assert_eq!(allowed, 4);
    }

    #[test]
    fn unlimited_never_stops() {
        assert!(AttemptLimit::Unlimited.can_retry(u32::MAX));
        assert_eq!(AttemptLimit::Unlimited.max_attempts(), None);
    }

    #[test]
    fn deadline_is_clamped_to_floor() {
        let mut cfg = RetryConfig::default();
        assert_eq!(cfg.deadline_clamped(), MIN_DEADLINE);

        cfg.deadline = Duration::from_millis(10);
        assert_eq!(cfg.normalized().deadline, MIN_DEADLINE);

        let cfg = RetryConfig {
            deadline: Duration::from_secs(30),
            ..RetryConfig::default()
        };
        assert_eq!(cfg.deadline_clamped(), Duration::from_secs(30));
    }

    #[test]
    fn defaults() {
        let cfg = RetryConfig::default();
        assert_eq!(cfg.attempts, AttemptLimit::Limited(0));
        assert!(!cfg.interruptible);
        assert_eq!(cfg.on_interrupt, InterruptMode::Abandon);
        assert_eq!(cfg.interval.next(2), Duration::ZERO);
    }
}
