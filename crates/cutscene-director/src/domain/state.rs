//! Director phase and the state snapshot read by UI affordances.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the director is in the life of the active timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No timeline is active.
    Idle,
    /// The screen is fading to opaque ahead of playback.
    FadingOut,
    /// Holding the opaque frame before the engine starts.
    Settling,
    /// The engine is playing.
    Playing,
    /// The engine is paused until a named input event arrives.
    PausedForInput,
    /// The engine is playing while the screen fades back in.
    FadingIn,
    /// Teardown ran; the closing fade is in progress.
    Ending,
}

impl Phase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FadingOut => "fading_out",
            Self::Settling => "settling",
            Self::Playing => "playing",
            Self::PausedForInput => "paused_for_input",
            Self::FadingIn => "fading_in",
            Self::Ending => "ending",
        }
    }

    /// Phases in which the engine has started and not yet been stopped.
    #[must_use]
    pub fn engine_running(self) -> bool {
        matches!(self, Self::Playing | Self::FadingIn | Self::PausedForInput)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of the director.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrchestratorState {
    /// Current phase.
    pub phase: Phase,
    /// Key of the timeline holding the director, if any.
    pub active_key: Option<String>,
    /// Fade flag captured when the active timeline started.
    pub uses_fade: bool,
    /// Whether the skip affordance is shown.
    pub skip_visible: bool,
}

impl OrchestratorState {
    /// The state of a director with nothing to do.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            active_key: None,
            uses_fade: false,
            skip_visible: false,
        }
    }
}
