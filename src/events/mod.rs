//! Diagnostic events emitted by a retry run.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! Events are delivered synchronously, on the engine's task, to the
//! [`SubscriberSet`](crate::SubscriberSet) configured on the policy.

mod event;

pub use event::{Event, EventKind};
