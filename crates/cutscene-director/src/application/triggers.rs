//! Scene-side triggers that talk to the director.
//!
//! Triggers hold no reference to the director; the owner passes it in by
//! `&mut` on every call.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::application::orchestrator::Orchestrator;

/// Capability of anything the player can interact with.
pub trait Interactable {
    /// The player interacted.
    fn interact(&mut self, director: &mut Orchestrator);

    /// Whether this interactable currently holds the screen.
    fn is_open(&self, director: &Orchestrator) -> bool;
}

/// What a trigger did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The director accepted the play request.
    Requested,
    /// The director rejected the request (busy, unknown key, ...).
    Rejected,
    /// A one-shot timeline has already been played; nothing was sent.
    AlreadyPlayed,
    /// The trigger is waiting for the player to press its input.
    AwaitingInput,
    /// The trigger is disabled or had nothing to do.
    Dormant,
}

impl TriggerOutcome {
    fn from_accepted(accepted: bool) -> Self {
        if accepted {
            Self::Requested
        } else {
            Self::Rejected
        }
    }
}

/// Plays a timeline on scene start or when fired by gameplay.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventTrigger {
    /// Registry key of the timeline.
    pub key: String,
    /// Fire from [`EventTrigger::start`].
    #[serde(default)]
    pub play_on_start: bool,
    /// Route through the one-shot gate.
    #[serde(default)]
    pub play_only_once: bool,
    #[serde(skip)]
    disabled: bool,
}

impl EventTrigger {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            play_on_start: false,
            play_only_once: false,
            disabled: false,
        }
    }

    #[must_use]
    pub fn on_start(mut self) -> Self {
        self.play_on_start = true;
        self
    }

    #[must_use]
    pub fn only_once(mut self) -> Self {
        self.play_only_once = true;
        self
    }

    /// Whether the trigger switched itself off at start.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Scene start. A one-shot trigger whose timeline already played
    /// disables itself and clears any input block left on the fade surface.
    pub fn start(&mut self, director: &mut Orchestrator) -> TriggerOutcome {
        if self.play_only_once && director.has_played(&self.key) {
            info!(key = %self.key, "one-shot timeline already played; trigger disabled");
            director.release_input_block();
            self.disabled = true;
            return TriggerOutcome::AlreadyPlayed;
        }
        if !self.play_on_start {
            return TriggerOutcome::Dormant;
        }
        self.fire(director)
    }

    /// Asks the director to play this trigger's timeline.
    pub fn fire(&mut self, director: &mut Orchestrator) -> TriggerOutcome {
        if self.disabled {
            debug!(key = %self.key, "trigger disabled; ignoring");
            return TriggerOutcome::Dormant;
        }
        if self.play_only_once {
            if director.has_played(&self.key) {
                return TriggerOutcome::AlreadyPlayed;
            }
            return TriggerOutcome::from_accepted(director.request_play(&self.key, true));
        }
        TriggerOutcome::from_accepted(director.request_play(&self.key, false))
    }
}

impl Interactable for EventTrigger {
    fn interact(&mut self, director: &mut Orchestrator) {
        self.fire(director);
    }

    fn is_open(&self, director: &Orchestrator) -> bool {
        director.active_key() == Some(self.key.as_str())
    }
}

/// Whether a zone plays every time the player walks in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneMode {
    /// Disable after the first accepted play.
    #[default]
    Once,
    /// Play on every entry.
    Everytime,
}

/// Plays a timeline when the player enters an area, optionally only after
/// they press an action input while inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneTrigger {
    key: String,
    mode: ZoneMode,
    require_input: Option<String>,
    hint_visible: bool,
    player_inside: bool,
    spent: bool,
}

impl ZoneTrigger {
    #[must_use]
    pub fn new(key: impl Into<String>, mode: ZoneMode) -> Self {
        Self {
            key: key.into(),
            mode,
            require_input: None,
            hint_visible: false,
            player_inside: false,
            spent: false,
        }
    }

    /// Waits for `action` while the player is inside instead of playing on
    /// entry. A blank name is ignored.
    #[must_use]
    pub fn requiring_input(mut self, action: impl Into<String>) -> Self {
        let action = action.into();
        self.require_input = (!action.trim().is_empty()).then_some(action);
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the "press to play" hint is shown.
    #[must_use]
    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    #[must_use]
    pub fn is_spent(&self) -> bool {
        self.spent
    }

    #[must_use]
    pub fn player_inside(&self) -> bool {
        self.player_inside
    }

    pub fn player_entered(&mut self, director: &mut Orchestrator) -> TriggerOutcome {
        if self.spent {
            return TriggerOutcome::Dormant;
        }
        self.player_inside = true;
        if let Some(action) = &self.require_input {
            debug!(key = %self.key, action = %action, "waiting for action input");
            self.hint_visible = true;
            return TriggerOutcome::AwaitingInput;
        }
        self.trigger(director)
    }

    pub fn player_exited(&mut self) {
        self.player_inside = false;
        self.hint_visible = false;
    }

    /// Forwards an action input. Plays only while the player is inside and
    /// `action` matches the required input.
    pub fn input(&mut self, director: &mut Orchestrator, action: &str) -> TriggerOutcome {
        if self.spent || !self.player_inside {
            return TriggerOutcome::Dormant;
        }
        if self.require_input.as_deref() != Some(action) {
            return TriggerOutcome::Dormant;
        }
        self.trigger(director)
    }

    fn trigger(&mut self, director: &mut Orchestrator) -> TriggerOutcome {
        let accepted = director.request_play(&self.key, false);
        // A rejected request leaves the player waiting in the zone.
        self.hint_visible = !accepted && self.require_input.is_some();
        if accepted && self.mode == ZoneMode::Once {
            info!(key = %self.key, "zone trigger spent");
            self.spent = true;
        }
        TriggerOutcome::from_accepted(accepted)
    }
}

/// A subtitle line authored on a timeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubtitleCue {
    pub text: String,
    /// Hold time in seconds. Missing, zero or invalid values use the
    /// overlay default.
    #[serde(default)]
    pub duration_secs: Option<f64>,
}

impl SubtitleCue {
    pub fn fire(&self, director: &mut Orchestrator) {
        let duration = self
            .duration_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok());
        director.show_subtitle(&self.text, duration);
    }
}

/// A point on a timeline where playback waits for a named input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputPauseCue {
    pub event_name: String,
}

impl InputPauseCue {
    pub fn fire(&self, director: &mut Orchestrator) {
        if self.event_name.trim().is_empty() {
            warn!("input pause cue has no event name; playback continues");
            return;
        }
        director.pause_for_input(&self.event_name);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::one_shot::OneShotGate;
    use crate::domain::registry::SequenceRegistry;
    use crate::domain::state::Phase;
    use cutscene_core::input::InputBus;
    use cutscene_core::sequence::{NamedSequence, SequenceHandle};
    use cutscene_core::store::KeyValueStore;
    use cutscene_test_support::{EngineCall, FixedClock, MemoryStore, RecordingPlaybackEngine};

    fn director(engine: &RecordingPlaybackEngine, store: &MemoryStore) -> Orchestrator {
        let registry = SequenceRegistry::build([
            NamedSequence::new("Intro", SequenceHandle::new("intro.timeline")),
            NamedSequence::new("Bus", SequenceHandle::new("bus.timeline")).without_fade(),
        ]);
        Orchestrator::new(
            registry,
            Box::new(engine.clone()),
            Arc::new(FixedClock::pinned()),
        )
        .with_one_shot_gate(OneShotGate::new(Box::new(store.clone())))
        .with_input(Box::new(InputBus::new()))
    }

    #[test]
    fn test_start_plays_when_play_on_start() {
        // Arrange
        let engine = RecordingPlaybackEngine::new();
        let mut director = director(&engine, &MemoryStore::new());
        let mut trigger = EventTrigger::new("Intro").on_start();

        // Act
        let outcome = trigger.start(&mut director);

        // Assert
        assert_eq!(outcome, TriggerOutcome::Requested);
        assert!(trigger.is_open(&director));
    }

    #[test]
    fn test_start_without_play_on_start_is_dormant() {
        // Arrange
        let engine = RecordingPlaybackEngine::new();
        let mut director = director(&engine, &MemoryStore::new());
        let mut trigger = EventTrigger::new("Intro");

        // Act
        let outcome = trigger.start(&mut director);

        // Assert
        assert_eq!(outcome, TriggerOutcome::Dormant);
        assert!(director.is_idle());
    }

    #[test]
    fn test_played_one_shot_disables_itself_at_start() {
        // Arrange
        let engine = RecordingPlaybackEngine::new();
        let mut store = MemoryStore::new();
        store.set_int("Intro", 1).unwrap();
        let mut director = director(&engine, &store);
        let mut trigger = EventTrigger::new("Intro").on_start().only_once();

        // Act
        let outcome = trigger.start(&mut director);
        let refired = trigger.fire(&mut director);

        // Assert
        assert_eq!(outcome, TriggerOutcome::AlreadyPlayed);
        assert_eq!(refired, TriggerOutcome::Dormant);
        assert!(trigger.is_disabled());
        assert!(director.is_idle());
        assert!(director.fade_surface().is_some_and(|f| !f.blocks_input()));
    }

    #[test]
    fn test_fire_does_not_mark_one_shot_itself() {
        // Arrange
        let engine = RecordingPlaybackEngine::new();
        let store = MemoryStore::new();
        let mut director = director(&engine, &store);
        let mut trigger = EventTrigger::new("Intro").only_once();

        // Act
        let outcome = trigger.fire(&mut director);

        // Assert
        assert_eq!(outcome, TriggerOutcome::Requested);
        assert_eq!(store.durable_value("Intro"), None);
    }

    #[test]
    fn test_interact_while_busy_is_rejected() {
        // Arrange
        let engine = RecordingPlaybackEngine::new();
        let mut director = director(&engine, &MemoryStore::new());
        director.play_by_key("Bus");
        let mut trigger = EventTrigger::new("Intro");

        // Act
        trigger.interact(&mut director);

        // Assert
        assert!(!trigger.is_open(&director));
        assert_eq!(director.active_key(), Some("Bus"));
    }

    #[test]
    fn test_zone_without_input_plays_on_entry_once() {
        // Arrange
        let engine = RecordingPlaybackEngine::new();
        let mut director = director(&engine, &MemoryStore::new());
        let mut zone = ZoneTrigger::new("Bus", ZoneMode::Once);

        // Act
        let first = zone.player_entered(&mut director);
        director.skip();
        zone.player_exited();
        let second = zone.player_entered(&mut director);

        // Assert
        assert_eq!(first, TriggerOutcome::Requested);
        assert_eq!(second, TriggerOutcome::Dormant);
        assert!(zone.is_spent());
    }

    #[test]
    fn test_zone_everytime_replays_after_release() {
        // Arrange
        let engine = RecordingPlaybackEngine::new();
        let mut director = director(&engine, &MemoryStore::new());
        let mut zone = ZoneTrigger::new("Bus", ZoneMode::Everytime);

        // Act
        zone.player_entered(&mut director);
        director.tick(Duration::from_millis(200));
        director.skip();
        zone.player_exited();
        let second = zone.player_entered(&mut director);

        // Assert
        assert_eq!(second, TriggerOutcome::Requested);
        assert!(!zone.is_spent());
    }

    #[test]
    fn test_zone_keeps_hint_when_director_is_busy() {
        // Arrange
        let engine = RecordingPlaybackEngine::new();
        let mut director = director(&engine, &MemoryStore::new());
        director.play_by_key("Intro");
        let mut zone = ZoneTrigger::new("Bus", ZoneMode::Once).requiring_input("Submit");
        zone.player_entered(&mut director);

        // Act
        let outcome = zone.input(&mut director, "Submit");

        // Assert
        assert_eq!(outcome, TriggerOutcome::Rejected);
        assert!(zone.hint_visible());
        assert!(!zone.is_spent());
        assert_eq!(director.active_key(), Some("Intro"));
    }

    #[test]
    fn test_zone_requiring_input_waits_for_matching_action() {
        // Arrange
        let engine = RecordingPlaybackEngine::new();
        let mut director = director(&engine, &MemoryStore::new());
        let mut zone = ZoneTrigger::new("Intro", ZoneMode::Once).requiring_input("Submit");

        // Act
        let entered = zone.player_entered(&mut director);
        let hint_after_entry = zone.hint_visible();
        let wrong = zone.input(&mut director, "Jump");
        let right = zone.input(&mut director, "Submit");

        // Assert
        assert_eq!(entered, TriggerOutcome::AwaitingInput);
        assert!(hint_after_entry);
        assert_eq!(wrong, TriggerOutcome::Dormant);
        assert_eq!(right, TriggerOutcome::Requested);
        assert!(!zone.hint_visible());
        assert_eq!(director.active_key(), Some("Intro"));
    }

    #[test]
    fn test_zone_input_after_exit_is_ignored() {
        // Arrange
        let engine = RecordingPlaybackEngine::new();
        let mut director = director(&engine, &MemoryStore::new());
        let mut zone = ZoneTrigger::new("Intro", ZoneMode::Once).requiring_input("Submit");
        zone.player_entered(&mut director);

        // Act
        zone.player_exited();
        let outcome = zone.input(&mut director, "Submit");

        // Assert
        assert_eq!(outcome, TriggerOutcome::Dormant);
        assert!(!zone.hint_visible());
        assert!(director.is_idle());
    }

    #[test]
    fn test_subtitle_cue_uses_default_for_invalid_duration() {
        // Arrange
        let engine = RecordingPlaybackEngine::new();
        let mut director = director(&engine, &MemoryStore::new());
        let cue = SubtitleCue {
            text: "Welcome aboard".into(),
            duration_secs: Some(-1.0),
        };

        // Act
        cue.fire(&mut director);

        // Assert
        assert!(director.subtitles().is_some_and(|s| !s.is_idle()));
    }

    #[test]
    fn test_input_pause_cue_with_blank_name_keeps_playing() {
        // Arrange
        let engine = RecordingPlaybackEngine::new();
        let mut director = director(&engine, &MemoryStore::new());
        director.play_by_key("Bus");
        director.tick(Duration::from_millis(200));
        let cue = InputPauseCue {
            event_name: "  ".into(),
        };

        // Act
        cue.fire(&mut director);

        // Assert
        assert_eq!(director.phase(), Phase::Playing);
        assert_eq!(engine.count(&EngineCall::Pause), 0);
    }

    #[test]
    fn test_input_pause_cue_pauses_playback() {
        // Arrange
        let engine = RecordingPlaybackEngine::new();
        let mut director = director(&engine, &MemoryStore::new());
        director.play_by_key("Bus");
        director.tick(Duration::from_millis(200));
        let cue = InputPauseCue {
            event_name: "Confirm".into(),
        };

        // Act
        cue.fire(&mut director);

        // Assert
        assert_eq!(director.phase(), Phase::PausedForInput);
        assert_eq!(engine.count(&EngineCall::Pause), 1);
    }

    #[test]
    fn test_event_trigger_deserializes_with_defaults() {
        let trigger: EventTrigger = serde_json::from_str(r#"{"key":"Intro"}"#).unwrap();

        assert_eq!(trigger, EventTrigger::new("Intro"));
    }
}
