//! # Action abstraction.
//!
//! An [`Action`] is the fallible operation a [`Retry`](crate::Retry) invokes once
//! per attempt. It takes no input and yields either a value or a failure.
//! The engine never runs two invocations of the same action concurrently.

use std::sync::Arc;

use async_trait::async_trait;

/// # Asynchronous, fallible unit of work.
///
/// Each call to [`call`](Action::call) is one attempt. Implementations should not keep
/// hidden state between attempts unless they mean to (e.g. counting calls).
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use retryvisor::Action;
///
/// struct Ping;
///
/// #[async_trait]
/// impl Action<u16, std::io::Error> for Ping {
///     fn name(&self) -> &str { "ping" }
///
///     async fn call(&self) -> Result<u16, std::io::Error> {
///         Ok(200)
///     }
/// }
/// ```
#[async_trait]
pub trait Action<T, E>: Send + Sync + 'static {
    /// Returns a stable, human-readable name used in diagnostics.
    fn name(&self) -> &str {
        "action"
    }

    /// Performs one attempt.
    async fn call(&self) -> Result<T, E>;
}

/// Shared handle to an action.
pub type ActionRef<T, E> = Arc<dyn Action<T, E>>;
