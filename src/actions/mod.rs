//! # Retryable actions.
//!
//! This module provides the operation types driven by the retry engine:
//! - [`Action`] - trait for an async, fallible unit of work
//! - [`ActionFn`] - closure-backed implementation
//! - [`ActionRef`] - shared reference to an action (`Arc<dyn Action>`)

mod action;
mod action_fn;

pub use action::{Action, ActionRef};
pub use action_fn::ActionFn;
