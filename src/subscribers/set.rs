//! # SubscriberSet: synchronous fan-out over multiple subscribers
//!
//! [`SubscriberSet`] hands each [`Event`] to every subscriber in order.
//!
//! ## What it guarantees
//! - Per-subscriber delivery in emission order.
//! - Panics inside subscribers are caught and logged (isolation).
//!
//! ## Diagram
//! ```text
//!    emit(&Event)
//!        ├──► S1.on_event()  (panic → tracing::error!, continue)
//!        ├──► S2.on_event()
//!        └──► SN.on_event()
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::events::Event;

use super::Subscribe;

/// Ordered set of subscribers sharing the same events.
#[derive(Clone, Default)]
pub struct SubscriberSet {
    subs: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    /// Creates a set over the given subscribers.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subs }
    }

    /// Delivers `event` to every subscriber.
    pub fn emit(&self, event: &Event) {
        for sub in self.subs.iter() {
            if let Err(panic_err) = catch_unwind(AssertUnwindSafe(|| sub.on_event(event))) {
                tracing::error!(
                    subscriber = sub.name(),
                    event = event.kind.as_label(),
                    "subscriber panicked: {}",
                    panic_message(panic_err.as_ref())
                );
            }
        }
    }

    /// Subscriber names, in delivery order.
    pub fn names(&self) -> Vec<&'static str> {
        self.subs.iter().map(|s| s.name()).collect()
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subs.len()
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<EventKind>>);

    impl Subscribe for Recorder {
        fn on_event(&self, event: &Event) {
            self.0.lock().unwrap().push(event.kind);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct Panicker;

    impl Subscribe for Panicker {
        fn on_event(&self, _event: &Event) {
            panic!("subscriber exploded");
        }

        fn name(&self) -> &'static str {
            "panicker"
        }
    }

    #[test]
    fn panicking_subscriber_does_not_block_others() {
        let rec = Arc::new(Recorder::default());
        let set = SubscriberSet::new(vec![
            Arc::new(Panicker) as Arc<dyn Subscribe>,
            rec.clone() as Arc<dyn Subscribe>,
        ]);

        set.emit(&Event::new(EventKind::AttemptStarting));
        set.emit(&Event::new(EventKind::Succeeded));

        assert_eq!(
            *rec.0.lock().unwrap(),
            vec![EventKind::AttemptStarting, EventKind::Succeeded]
        );
        assert_eq!(set.names(), vec!["panicker", "recorder"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn empty_set_is_noop() {
        let set = SubscriberSet::default();
        assert!(set.is_empty());
        set.emit(&Event::new(EventKind::Recovered));
    }
}
