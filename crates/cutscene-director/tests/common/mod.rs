//! Shared fixtures for director integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use cutscene_core::input::InputBus;
use cutscene_core::sequence::{NamedSequence, SequenceHandle};
use cutscene_director::application::one_shot::OneShotGate;
use cutscene_director::application::orchestrator::Orchestrator;
use cutscene_director::domain::events::{DirectorEvent, DirectorEventKind};
use cutscene_director::domain::registry::SequenceRegistry;
use cutscene_test_support::{FixedClock, MemoryStore, RecordingPlaybackEngine, RecordingSkipButton};

pub const FADE: Duration = Duration::from_secs(1);
pub const SETTLE: Duration = Duration::from_millis(200);
pub const FRAME: Duration = Duration::from_millis(16);

/// A director wired to recording doubles that the test keeps handles to.
pub struct Harness {
    pub director: Orchestrator,
    pub engine: RecordingPlaybackEngine,
    pub store: MemoryStore,
    pub input: InputBus,
    pub skip_button: RecordingSkipButton,
}

pub fn registry() -> SequenceRegistry {
    SequenceRegistry::build([
        NamedSequence::new("Intro", SequenceHandle::new("intro.timeline")),
        NamedSequence::new("A", SequenceHandle::new("a.timeline")),
        NamedSequence::new("B", SequenceHandle::new("b.timeline")),
        NamedSequence::new("Door", SequenceHandle::new("door.timeline")).without_fade(),
    ])
}

impl Harness {
    pub fn new() -> Self {
        Self::with_parts(RecordingPlaybackEngine::new(), MemoryStore::new())
    }

    pub fn with_parts(engine: RecordingPlaybackEngine, store: MemoryStore) -> Self {
        let input = InputBus::new();
        let skip_button = RecordingSkipButton::new();
        let director = Orchestrator::new(
            registry(),
            Box::new(engine.clone()),
            Arc::new(FixedClock::pinned()),
        )
        .with_input(Box::new(input.clone()))
        .with_skip_affordance(Box::new(skip_button.clone()))
        .with_one_shot_gate(OneShotGate::new(Box::new(store.clone())));
        Self {
            director,
            engine,
            store,
            input,
            skip_button,
        }
    }

    /// Drives a fading timeline from the request through fade-in.
    pub fn run_to_playing(&mut self, key: &str) {
        self.director.play_by_key(key);
        self.director.tick(FADE);
        self.director.tick(SETTLE);
        self.director.tick(FADE);
    }

    /// Same as [`Harness::run_to_playing`] through the one-shot gate.
    pub fn run_to_playing_once(&mut self, key: &str) {
        self.director.play_once(key);
        self.director.tick(FADE);
        self.director.tick(SETTLE);
        self.director.tick(FADE);
    }

    /// Drives the closing fade-out, settle and fade-in.
    pub fn run_closing_fade(&mut self) {
        self.director.tick(FADE);
        self.director.tick(SETTLE);
        self.director.tick(FADE);
    }

    pub fn event_types(&mut self) -> Vec<String> {
        self.director
            .drain_events()
            .into_iter()
            .map(|event| event.metadata.event_type)
            .collect()
    }
}

pub fn rejection_code(event: &DirectorEvent) -> Option<&str> {
    match &event.kind {
        DirectorEventKind::RequestRejected(rejected) => Some(rejected.code.as_str()),
        _ => None,
    }
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}
