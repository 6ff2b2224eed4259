//! # Function-backed action (`ActionFn`)
//!
//! [`ActionFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per attempt.
//! Shared state across attempts has to be captured explicitly (e.g. `Arc<AtomicU32>`).
//!
//! ## Example
//! ```rust
//! use retryvisor::{Action, ActionFn};
//!
//! let fetch = ActionFn::new("fetch", || async { Ok::<_, std::io::Error>("body") });
//! assert_eq!(fetch.name(), "fetch");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::actions::action::Action;

/// Closure-backed action.
#[derive(Debug)]
pub struct ActionFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ActionFn<F> {
    /// Creates a new function-backed action.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the action and returns it behind an `Arc`.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut, T, E> Action<T, E> for ActionFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self) -> Result<T, E> {
        (self.f)().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn each_call_creates_a_fresh_future() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let action = ActionFn::new("count", move || {
            let counter = Arc::clone(&counter);
            async move { Ok::<_, std::io::Error>(counter.fetch_add(1, Ordering::SeqCst) + 1) }
        });

        assert_eq!(action.call().await.ok(), Some(1));
        assert_eq!(action.call().await.ok(), Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn name_is_kept() {
        let action = ActionFn::arc("named", || async { Ok::<(), std::io::Error>(()) });
        assert_eq!(action.name(), "named");
    }
}
