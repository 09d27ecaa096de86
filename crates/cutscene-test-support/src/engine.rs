//! Test playback engine: records every call the director makes.

use std::sync::{Arc, Mutex};

use cutscene_core::engine::{FinishedNotifier, FinishedSubscription, PlaybackEngine, finished_channel};
use cutscene_core::error::CutsceneError;
use cutscene_core::sequence::SequenceHandle;

/// A call observed by [`RecordingPlaybackEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    /// `set_sequence` with the handle's asset id.
    SetSequence(String),
    /// `play`.
    Play,
    /// `pause`.
    Pause,
    /// `resume`.
    Resume,
    /// `stop`.
    Stop,
    /// `subscribe_finished`.
    Subscribe,
}

#[derive(Debug, Default)]
struct EngineLog {
    calls: Vec<EngineCall>,
    notifier: Option<FinishedNotifier>,
    fail_play: bool,
}

/// A playback engine that records every call and only finishes when the
/// test calls [`RecordingPlaybackEngine::finish`]. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingPlaybackEngine {
    log: Arc<Mutex<EngineLog>>,
}

impl RecordingPlaybackEngine {
    /// Creates an engine that accepts every call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine whose `play` always fails, as if the host engine
    /// were unavailable.
    #[must_use]
    pub fn failing_on_play() -> Self {
        let engine = Self::default();
        engine.log.lock().unwrap().fail_play = true;
        engine
    }

    /// Snapshot of all calls so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<EngineCall> {
        self.log.lock().unwrap().calls.clone()
    }

    /// How many times `call` was observed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn count(&self, call: &EngineCall) -> usize {
        self.log
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| *c == call)
            .count()
    }

    /// Fires the "finished" notification, as if the sequence reached its end.
    /// Returns whether a live subscriber observed it.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn finish(&self) -> bool {
        self.log
            .lock()
            .unwrap()
            .notifier
            .as_mut()
            .is_some_and(FinishedNotifier::fire)
    }

    /// Whether somebody still listens for the "finished" notification.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn has_subscriber(&self) -> bool {
        self.log
            .lock()
            .unwrap()
            .notifier
            .as_ref()
            .is_some_and(FinishedNotifier::is_armed)
    }

    /// Drops the "finished" notifier without firing it, as an engine that
    /// was torn down underneath the director would.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn abandon_finished(&self) {
        self.log.lock().unwrap().notifier = None;
    }

    fn push(&self, call: EngineCall) {
        self.log.lock().unwrap().calls.push(call);
    }
}

impl PlaybackEngine for RecordingPlaybackEngine {
    fn set_sequence(&mut self, handle: &SequenceHandle) -> Result<(), CutsceneError> {
        self.push(EngineCall::SetSequence(handle.asset().to_owned()));
        Ok(())
    }

    fn play(&mut self) -> Result<(), CutsceneError> {
        self.push(EngineCall::Play);
        if self.log.lock().unwrap().fail_play {
            return Err(CutsceneError::Engine("engine unavailable".into()));
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.push(EngineCall::Pause);
    }

    fn resume(&mut self) {
        self.push(EngineCall::Resume);
    }

    fn stop(&mut self) {
        self.push(EngineCall::Stop);
    }

    fn subscribe_finished(&mut self) -> FinishedSubscription {
        self.push(EngineCall::Subscribe);
        let (notifier, subscription) = finished_channel();
        self.log.lock().unwrap().notifier = Some(notifier);
        subscription
    }
}
