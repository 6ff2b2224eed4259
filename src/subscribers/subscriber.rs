//! # Event subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for diagnostic sinks.

use crate::events::Event;

/// Event subscriber for run diagnostics.
///
/// ### Implementation requirements
/// - Return quickly; events are delivered on the engine's task.
/// - Handle errors internally; panics are caught but logged as errors.
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
