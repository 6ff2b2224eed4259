//! # Failure classification.
//!
//! Decides whether a failed attempt may be retried. Failures carry a kind tag
//! ([`FailureKind`]) from a caller-declared taxonomy; each kind names its parent,
//! so a configured kind also matches all of its descendants.
//!
//! ```text
//! Runtime
//!  └─ IllegalArgument
//!      └─ NumberFormat
//!
//! RetryOn::kinds([IllegalArgument])
//!   NumberFormat    → retry (is-a IllegalArgument)
//!   IllegalArgument → retry
//!   Runtime         → stop
//! ```
//!
//! ## Rules
//! - [`Matcher::Any`] matches every failure; it is the default set.
//! - An empty matcher list is replaced by `[Any]`.
//! - Matching is evaluated for every failure; nothing is cached.

use std::fmt;
use std::io;

/// Upper bound on parent hops; cyclic taxonomies stop here.
const MAX_DEPTH: usize = 64;

/// A failure category with an optional parent category.
///
/// # Example
/// ```rust
/// use retryvisor::FailureKind;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Kind { Io, Timeout }
///
/// impl FailureKind for Kind {
///     fn parent(&self) -> Option<Self> {
///         match self {
///             Kind::Timeout => Some(Kind::Io),
///             Kind::Io => None,
///         }
///     }
/// }
///
/// assert!(Kind::Timeout.is_a(Kind::Io));
/// assert!(!Kind::Io.is_a(Kind::Timeout));
/// ```
pub trait FailureKind: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Immediate parent, `None` for roots.
    fn parent(&self) -> Option<Self>;

    /// True if `self` equals `ancestor` or descends from it.
    fn is_a(&self, ancestor: Self) -> bool {
        let mut current = Some(*self);
        for _ in 0..MAX_DEPTH {
            match current {
                Some(kind) if kind == ancestor => return true,
                Some(kind) => current = kind.parent(),
                None => return false,
            }
        }
        false
    }
}

/// An action error that can be classified.
pub trait Failure: std::error::Error + Send + Sync + 'static {
    type Kind: FailureKind;

    /// Runtime kind of this failure.
    fn kind(&self) -> Self::Kind;
}

/// One entry of the retryable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher<K> {
    /// Matches every failure.
    Any,
    /// Matches `K` and its descendants.
    Kind(K),
}

impl<K: FailureKind> Matcher<K> {
    /// True if a failure of `kind` satisfies this matcher.
    pub fn matches(&self, kind: K) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::Kind(k) => kind.is_a(*k),
        }
    }
}

/// Non-empty set of matchers that permit another attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOn<K> {
    matchers: Vec<Matcher<K>>,
}

impl<K: FailureKind> Default for RetryOn<K> {
    fn default() -> Self {
        Self::any()
    }
}

impl<K: FailureKind> RetryOn<K> {
    /// Retry on every failure.
    pub fn any() -> Self {
        Self {
            matchers: vec![Matcher::Any],
        }
    }

    /// Retry on the given kinds (and their descendants). Empty input means [`RetryOn::any`].
    pub fn kinds(kinds: impl IntoIterator<Item = K>) -> Self {
        Self::new(kinds.into_iter().map(Matcher::Kind).collect())
    }

    /// Builds a set from raw matchers. Empty input means [`RetryOn::any`].
    pub fn new(matchers: Vec<Matcher<K>>) -> Self {
        if matchers.is_empty() {
            return Self::any();
        }
        Self { matchers }
    }

    /// Configured matchers (never empty).
    pub fn matchers(&self) -> &[Matcher<K>] {
        &self.matchers
    }

    /// True if the set contains [`Matcher::Any`].
    pub fn is_catch_all(&self) -> bool {
        self.matchers.iter().any(|m| matches!(m, Matcher::Any))
    }

    /// True if at least one matcher accepts `kind`.
    pub fn matches(&self, kind: K) -> bool {
        self.matchers.iter().any(|m| m.matches(kind))
    }
}

/// True if `failure` may be retried under `retry_on`.
pub fn is_retryable<E: Failure>(failure: &E, retry_on: &RetryOn<E::Kind>) -> bool {
    retry_on.matches(failure.kind())
}

impl FailureKind for io::ErrorKind {
    fn parent(&self) -> Option<Self> {
        None
    }
}

impl Failure for io::Error {
    type Kind = io::ErrorKind;

    fn kind(&self) -> io::ErrorKind {
        io::Error::kind(self)
    }
}
