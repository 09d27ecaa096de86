//! Playback engine abstraction.
//!
//! The engine is the host-side component that actually advances sequence
//! time. The director only tells it what to play and when to pause, resume
//! or stop, and listens for a single "finished" notification.

use crate::error::CutsceneError;
use crate::sequence::SequenceHandle;
use crate::signal::{SignalReceiver, SignalSender, signal};

/// Engine-side half of a "finished" subscription.
pub type FinishedNotifier = SignalSender;

/// Director-side half of a "finished" subscription. Dropping it unsubscribes.
pub type FinishedSubscription = SignalReceiver;

/// Creates a connected notifier/subscription pair for engine implementations.
#[must_use]
pub fn finished_channel() -> (FinishedNotifier, FinishedSubscription) {
    signal()
}

/// Drives an opaque sequence handle.
pub trait PlaybackEngine: Send {
    /// Loads the sequence to be played next.
    ///
    /// # Errors
    ///
    /// Returns `CutsceneError::Engine` if the engine cannot load the handle.
    fn set_sequence(&mut self, handle: &SequenceHandle) -> Result<(), CutsceneError>;

    /// Starts the loaded sequence from time zero.
    ///
    /// # Errors
    ///
    /// Returns `CutsceneError::Engine` if the engine is unavailable.
    fn play(&mut self) -> Result<(), CutsceneError>;

    /// Freezes sequence time without releasing the sequence.
    fn pause(&mut self);

    /// Continues a paused sequence.
    fn resume(&mut self);

    /// Stops the sequence. Must be safe to call when nothing is playing.
    fn stop(&mut self);

    /// Subscribes to the next "finished" notification. The notification only
    /// fires when the sequence reaches its end unassisted, never on `stop`.
    /// A new subscription replaces any previous one.
    fn subscribe_finished(&mut self) -> FinishedSubscription;
}
