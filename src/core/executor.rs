//! # Where a run executes.
//!
//! A run is one future handed to an [`Executor`]. Two implementations ship with the crate:
//!
//! | Executor          | Runs on                         | `result_future()` returns |
//! |-------------------|---------------------------------|---------------------------|
//! | [`InlineExecutor`] | the calling thread, to completion | an already-completed future |
//! | [`TokioExecutor`]  | a tokio runtime (worker pool)    | immediately, run in background |
//!
//! ## Inline rules
//! - Outside any runtime: a current-thread runtime is built for the run.
//! - Inside a multi-thread runtime: the worker is handed over with
//!   [`tokio::task::block_in_place`] and the run is driven on it.
//! - Inside a current-thread runtime: rejected with [`ExecutorError::NestedRuntime`].

use std::sync::OnceLock;

use futures::future::BoxFuture;
use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};

use crate::error::ExecutorError;

/// A submitted run.
pub type RunFuture = BoxFuture<'static, ()>;

/// Task-submission capability used by the engine.
pub trait Executor: Send + Sync + 'static {
    /// Accepts `run` for execution.
    ///
    /// Returning `Ok` means the run will be (or already has been) driven to completion.
    fn execute(&self, run: RunFuture) -> Result<(), ExecutorError>;

    /// Name used in policy snapshots.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Runs on the calling thread and returns when the run is finished.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn execute(&self, run: RunFuture) -> Result<(), ExecutorError> {
        match Handle::try_current() {
            Ok(handle) => match handle.runtime_flavor() {
                RuntimeFlavor::MultiThread => {
                    tokio::task::block_in_place(|| handle.block_on(run));
                    Ok(())
                }
                _ => Err(ExecutorError::NestedRuntime),
            },
            Err(_) => {
                let rt = Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| ExecutorError::Build {
                        reason: e.to_string(),
                    })?;
                rt.block_on(run);
                Ok(())
            }
        }
    }

    fn name(&self) -> &'static str {
        "inline"
    }
}

/// Spawns runs onto a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioExecutor {
    handle: Handle,
}

static SHARED_POOL: OnceLock<Result<Runtime, String>> = OnceLock::new();

impl TokioExecutor {
    /// Spawns onto the runtime behind `handle`.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Spawns onto the runtime the caller is running in.
    pub fn current() -> Result<Self, ExecutorError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| ExecutorError::NoRuntime {
                reason: e.to_string(),
            })
    }

    /// Spawns onto a process-wide multi-thread pool, started on first use.
    pub fn shared() -> Result<Self, ExecutorError> {
        let pool = SHARED_POOL.get_or_init(|| {
            Builder::new_multi_thread()
                .thread_name("retryvisor-worker")
                .enable_all()
                .build()
                .map_err(|e| e.to_string())
        });
        match pool {
            Ok(rt) => Ok(Self::new(rt.handle().clone())),
            Err(reason) => Err(ExecutorError::Build {
                reason: reason.clone(),
            }),
        }
    }

    /// The runtime handle runs are spawned on.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl Executor for TokioExecutor {
    fn execute(&self, run: RunFuture) -> Result<(), ExecutorError> {
        drop(self.handle.spawn(run));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "tokio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn flag_run(flag: &Arc<AtomicBool>) -> RunFuture {
        let flag = Arc::clone(flag);
        Box::pin(async move {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
            flag.store(true, Ordering::SeqCst);
        })
    }

    #[test]
    fn inline_outside_runtime_runs_to_completion() {
        let done = Arc::new(AtomicBool::new(false));
        InlineExecutor.execute(flag_run(&done)).unwrap();
        assert!(done.load(Ordering::SeqCst));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn inline_inside_multi_thread_runtime_blocks_in_place() {
        let done = Arc::new(AtomicBool::new(false));
        InlineExecutor.execute(flag_run(&done)).unwrap();
        assert!(done.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn inline_inside_current_thread_runtime_is_rejected() {
        let done = Arc::new(AtomicBool::new(false));
        let err = InlineExecutor.execute(flag_run(&done)).unwrap_err();
        assert_eq!(err, ExecutorError::NestedRuntime);
        assert!(!done.load(Ordering::SeqCst));
    }

    #[test]
    fn current_without_runtime_fails() {
        let err = TokioExecutor::current().unwrap_err();
        assert_eq!(err.as_label(), "executor_no_runtime");
    }

    #[tokio::test]
    async fn tokio_executor_spawns_in_background() {
        let done = Arc::new(AtomicBool::new(false));
        TokioExecutor::current()
            .unwrap()
            .execute(flag_run(&done))
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(done.load(Ordering::SeqCst));
    }

    #[test]
    fn shared_pool_runs_in_background() {
        let a = TokioExecutor::shared().unwrap();
        assert_eq!(a.handle().runtime_flavor(), RuntimeFlavor::MultiThread);

        let done = Arc::new(AtomicBool::new(false));
        let (tx, rx) = std::sync::mpsc::channel();
        let flag = Arc::clone(&done);
        TokioExecutor::shared()
            .unwrap()
            .execute(Box::pin(async move {
                flag.store(true, Ordering::SeqCst);
                let _ = tx.send(());
            }))
            .unwrap();
        rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
        assert!(done.load(Ordering::SeqCst));
    }
}
