//! # Example: blocking
//!
//! Retries a flaky lookup on the calling thread and blocks for the result.
//!
//! The action fails twice with a retryable I/O kind, then succeeds. Diagnostics go
//! through the default [`LogWriter`](retryvisor::LogWriter) into `tracing`.
//!
//! ## Flow
//! ```text
//! result_blocking()
//!   ├─► InlineExecutor builds a current-thread runtime
//!   ├─► attempt 1 → Err(TimedOut)     → failure hook
//!   ├─► sleep(50ms)
//!   ├─► attempt 2 → Err(TimedOut)     → failure hook
//!   ├─► sleep(100ms)
//!   ├─► attempt 3 → Ok("eu-west-1")   → success hook
//!   └─► returns Some("eu-west-1")
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=retryvisor=debug cargo run --example blocking
//! ```

use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use retryvisor::{IntervalStrategy, Retry, TimeUnit};
use tracing_subscriber::EnvFilter;

static CALLS: AtomicU32 = AtomicU32::new(0);

fn lookup_region() -> io::Result<String> {
    let n = CALLS.fetch_add(1, Ordering::Relaxed) + 1;
    println!("[lookup] attempt {n}");
    if n <= 2 {
        Err(io::Error::new(io::ErrorKind::TimedOut, format!("slow answer #{n}")))
    } else {
        Ok(String::from("eu-west-1"))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let retry = Retry::of_fn(lookup_region)
        .attempts(5)
        .retry_on([io::ErrorKind::TimedOut, io::ErrorKind::ConnectionRefused])
        .interval_in(IntervalStrategy::exponential(50, 2.0, 500), TimeUnit::Millis)
        .deadline(Duration::from_secs(3))
        .on_success(|region, _| println!("[hook] resolved region {region}"))
        .on_failure(|w| println!("[hook] {}", w.failure()))
        .recover_value(String::from("us-east-1"))
        .build()?;

    let region = retry.result_blocking();
    println!("region = {region:?}");

    // the result is fixed once delivered
    assert_eq!(retry.result_blocking(), region);
    Ok(())
}
