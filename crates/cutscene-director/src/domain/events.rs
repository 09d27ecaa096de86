//! Events reported by the director.
//!
//! These are the observability channel across the trigger boundary: every
//! transition and every rejected request produces one.

use cutscene_core::clock::Clock;
use cutscene_core::event::{EventMetadata, ObservableEvent};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a timeline reached its teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The engine reported the end of the sequence.
    Completed,
    /// The player skipped.
    Skipped,
    /// The host forced a stop.
    Stopped,
}

/// A play request was accepted and the director left idle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackAccepted {
    /// Timeline key.
    pub key: String,
    /// Whether the screen fades around this timeline.
    pub uses_fade: bool,
    /// Whether completion will be recorded in the one-shot gate.
    pub one_shot: bool,
}

/// The engine started playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackStarted {
    /// Timeline key.
    pub key: String,
    /// Asset handed to the engine.
    pub asset: String,
}

/// Playback paused until an input event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PausedForInput {
    /// Timeline key.
    pub key: String,
    /// Input event being waited for.
    pub event_name: String,
}

/// Playback resumed after the awaited input arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resumed {
    /// Timeline key.
    pub key: String,
    /// Input event that arrived.
    pub event_name: String,
}

/// Teardown ran for the active timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackEnded {
    /// Timeline key.
    pub key: String,
    /// How the timeline ended.
    pub reason: EndReason,
}

/// The director returned to idle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorReleased {
    /// Key of the timeline that held the director.
    pub key: String,
}

/// The engine refused to start; the director aborted to idle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineFailed {
    /// Timeline key.
    pub key: String,
    /// Engine error message.
    pub message: String,
}

/// A one-shot timeline was persisted as played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneShotRecorded {
    /// Timeline key.
    pub key: String,
}

/// Persisting a one-shot completion failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneShotFailed {
    /// Timeline key.
    pub key: String,
    /// Store error message.
    pub message: String,
}

/// A request was rejected without changing state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRejected {
    /// The rejected operation.
    pub operation: String,
    /// Timeline key involved, if any.
    pub key: Option<String>,
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectorEventKind {
    /// See [`PlaybackAccepted`].
    PlaybackAccepted(PlaybackAccepted),
    /// See [`PlaybackStarted`].
    PlaybackStarted(PlaybackStarted),
    /// See [`PausedForInput`].
    PausedForInput(PausedForInput),
    /// See [`Resumed`].
    Resumed(Resumed),
    /// See [`PlaybackEnded`].
    PlaybackEnded(PlaybackEnded),
    /// See [`DirectorReleased`].
    DirectorReleased(DirectorReleased),
    /// See [`EngineFailed`].
    EngineFailed(EngineFailed),
    /// See [`OneShotRecorded`].
    OneShotRecorded(OneShotRecorded),
    /// See [`OneShotFailed`].
    OneShotFailed(OneShotFailed),
    /// See [`RequestRejected`].
    RequestRejected(RequestRejected),
}

impl DirectorEventKind {
    fn type_name(&self) -> &'static str {
        match self {
            Self::PlaybackAccepted(_) => "director.playback_accepted",
            Self::PlaybackStarted(_) => "director.playback_started",
            Self::PausedForInput(_) => "director.paused_for_input",
            Self::Resumed(_) => "director.resumed",
            Self::PlaybackEnded(_) => "director.playback_ended",
            Self::DirectorReleased(_) => "director.released",
            Self::EngineFailed(_) => "director.engine_failed",
            Self::OneShotRecorded(_) => "director.one_shot_recorded",
            Self::OneShotFailed(_) => "director.one_shot_failed",
            Self::RequestRejected(_) => "director.request_rejected",
        }
    }
}

/// Event envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: DirectorEventKind,
}

impl DirectorEvent {
    /// Stamps `kind` with fresh metadata.
    #[must_use]
    pub fn new(correlation_id: Uuid, kind: DirectorEventKind, clock: &dyn Clock) -> Self {
        Self {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.type_name().to_owned(),
                correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        }
    }
}

impl ObservableEvent for DirectorEvent {
    fn event_type(&self) -> &'static str {
        self.kind.type_name()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
