//! # Diagnostic sinks for retry runs.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for handling [`Event`](crate::Event)s emitted by the engine.
//!
//! ## Architecture
//! ```text
//! Retry run ── emit(&Event) ──► SubscriberSet ──┬──► LogWriter::on_event()   (default)
//!   (engine task)                               ├──► Metrics::on_event()
//!                                               └──► Custom::on_event()
//! ```
//!
//! ## Rules
//! - Delivery is synchronous, on the engine's task, in emission order.
//! - A panicking subscriber is isolated; the run and other subscribers continue.
//! - Slow subscribers delay the run (like hooks do).
//!
//! ## Implementing custom subscribers
//! ```rust
//! use retryvisor::{Event, EventKind, Subscribe};
//!
//! struct FailureCounter(std::sync::atomic::AtomicU32);
//!
//! impl Subscribe for FailureCounter {
//!     fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::AttemptFailed {
//!             self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "failure-counter" }
//! }
//! ```

mod log;
mod set;
mod subscriber;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub(crate) use set::panic_message;
pub use subscriber::Subscribe;
