//! Input event abstraction.
//!
//! The director never polls devices. It asks an input source for a one-shot
//! signal that fires the next time a named input event happens.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::signal::{SignalReceiver, SignalSender, SignalState, signal};

/// A pending wait for one named input event.
#[derive(Debug)]
pub struct InputWait {
    event_name: String,
    receiver: SignalReceiver,
}

impl InputWait {
    /// Wraps a receiver that fires when `event_name` occurs.
    #[must_use]
    pub fn new(event_name: impl Into<String>, receiver: SignalReceiver) -> Self {
        Self {
            event_name: event_name.into(),
            receiver,
        }
    }

    /// The input event this wait is listening for.
    #[must_use]
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Polls the wait without blocking.
    pub fn poll(&mut self) -> SignalState {
        self.receiver.poll()
    }
}

/// Source of named input events.
pub trait InputEventSource: Send {
    /// Returns a wait that fires once, the next time `event_name` occurs.
    fn wait_for_event(&mut self, event_name: &str) -> InputWait;
}

/// Push-based input source. Whoever reads the device calls [`InputBus::fire`];
/// every wait registered for that name is released exactly once.
///
/// Clones share the same set of waiters.
#[derive(Debug, Clone, Default)]
pub struct InputBus {
    waiters: Arc<Mutex<HashMap<String, Vec<SignalSender>>>>,
}

impl InputBus {
    /// Creates a bus with no waiters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event_name` to its waiters and returns how many observed it.
    pub fn fire(&self, event_name: &str) -> usize {
        let senders = self
            .waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(event_name)
            .unwrap_or_default();
        let delivered = senders
            .into_iter()
            .map(|mut sender| sender.fire())
            .filter(|observed| *observed)
            .count();
        debug!(event_name, delivered, "input event fired");
        delivered
    }

    /// Number of live waits for `event_name`.
    #[must_use]
    pub fn pending(&self, event_name: &str) -> usize {
        self.waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_name)
            .map_or(0, |senders| senders.iter().filter(|s| s.is_armed()).count())
    }
}

impl InputEventSource for InputBus {
    fn wait_for_event(&mut self, event_name: &str) -> InputWait {
        let (sender, receiver) = signal();
        let mut waiters = self.waiters.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = waiters.entry(event_name.to_owned()).or_default();
        entry.retain(SignalSender::is_armed);
        entry.push(sender);
        InputWait::new(event_name, receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_releases_only_matching_waits() {
        // Arrange
        let mut bus = InputBus::new();
        let mut confirm = bus.wait_for_event("Confirm");
        let mut cancel = bus.wait_for_event("Cancel");

        // Act
        let delivered = bus.fire("Confirm");

        // Assert
        assert_eq!(delivered, 1);
        assert_eq!(confirm.poll(), SignalState::Fired);
        assert_eq!(cancel.poll(), SignalState::Pending);
    }

    #[test]
    fn test_fire_before_wait_is_not_remembered() {
        let mut bus = InputBus::new();
        assert_eq!(bus.fire("Confirm"), 0);

        let mut wait = bus.wait_for_event("Confirm");

        assert_eq!(wait.poll(), SignalState::Pending);
    }

    #[test]
    fn test_dropped_wait_is_not_counted_as_pending() {
        let mut bus = InputBus::new();
        let wait = bus.wait_for_event("Confirm");
        assert_eq!(bus.pending("Confirm"), 1);

        drop(wait);

        assert_eq!(bus.pending("Confirm"), 0);
        assert_eq!(bus.fire("Confirm"), 0);
    }

    #[test]
    fn test_wait_consumes_exactly_one_event() {
        let mut bus = InputBus::new();
        let mut wait = bus.wait_for_event("Confirm");

        bus.fire("Confirm");
        bus.fire("Confirm");

        assert_eq!(wait.poll(), SignalState::Fired);
        assert_eq!(bus.pending("Confirm"), 0);
    }
}
