//! # Example: async_pool
//!
//! Runs retries on a tokio runtime and observes them asynchronously.
//!
//! Shows how to:
//! - Submit runs to the current runtime with [`TokioExecutor`].
//! - Attach a custom [`Subscribe`] implementation.
//! - Interrupt an interruptible run and fall back to the recovery value.
//! - Defer a run with [`Retry::deferred`].
//!
//! ## Flow
//! ```text
//! result_future() ──► TokioExecutor::execute(run)
//!   ├─► attempt 1 → Err(ConnectionRefused)
//!   ├─► sleep(2s) ◄── interrupt()
//!   ├─► InterruptMode::Recover
//!   └─► complete(recover(context)) ──► fut.await
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example async_pool
//! ```

use std::io;
use std::sync::Arc;
use std::time::Duration;

use retryvisor::{
    Event, EventKind, IntervalStrategy, InterruptMode, Retry, Subscribe, TokioExecutor,
};

/// Prints terminal events.
struct ConsoleSubscriber;

impl Subscribe for ConsoleSubscriber {
    fn on_event(&self, ev: &Event) {
        match ev.kind {
            EventKind::Succeeded | EventKind::Recovered | EventKind::RunAborted => {
                println!(
                    "[sub] {}: action={} attempt={} reason={}",
                    ev.kind.as_label(),
                    ev.action.as_deref().unwrap_or("<unknown>"),
                    ev.attempt.unwrap_or(0),
                    ev.reason.as_deref().unwrap_or("-"),
                );
            }
            EventKind::IntervalScheduled => {
                println!("[sub] waiting {:?} before attempt {:?}", ev.delay, ev.attempt);
            }
            _ => {}
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Interruptible run with a business context used by recovery
    let connect = Retry::with_context(
        || async {
            Err::<u16, _>(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "primary is down",
            ))
        },
        8080u16,
    )
    .attempts(10)
    .interval(IntervalStrategy::fixed_duration(Duration::from_secs(2)))
    .deadline(Duration::from_secs(30))
    .interruptible()
    .on_interrupt(InterruptMode::Recover)
    .recover(|port| port.copied())
    .executor(TokioExecutor::current()?)
    .subscriber(Arc::new(ConsoleSubscriber))
    .build()?;

    let fut = connect.result_future();
    tokio::time::sleep(Duration::from_millis(100)).await;
    connect.interrupt();
    println!("fallback port = {:?}", fut.await);

    // 2. Deferred run: nothing happens until the future is polled
    let greet = Retry::of(|| async { Ok::<_, io::Error>("hello") })
        .executor(TokioExecutor::current()?)
        .subscriber(Arc::new(ConsoleSubscriber))
        .build()?;

    let later = greet.deferred();
    println!("deferred created, completed = {}", greet.future().is_completed());
    println!("deferred result = {:?}", later.await);
    Ok(())
}
