//! Commands a trigger can send to the director.

use std::time::Duration;

/// A request crossing the trigger boundary. None of these report failure to
/// the sender; rejections surface as director events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectorCommand {
    /// Play a timeline by key, ignoring the one-shot gate.
    PlayByKey {
        /// Registry key.
        key: String,
    },
    /// Play a timeline only if it has never completed, recording it when it ends.
    PlayOnce {
        /// Registry key.
        key: String,
    },
    /// End the active timeline early.
    Skip,
    /// End the active timeline on behalf of the host.
    ForceStop,
    /// Pause the active timeline until `event_name` fires.
    PauseForInput {
        /// Input event to wait for.
        event_name: String,
    },
    /// Enqueue a subtitle line.
    ShowSubtitle {
        /// Text to display.
        text: String,
        /// Hold time; the overlay default when absent.
        duration: Option<Duration>,
    },
}

impl DirectorCommand {
    /// The command name (for logging).
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlayByKey { .. } => "play_by_key",
            Self::PlayOnce { .. } => "play_once",
            Self::Skip => "skip",
            Self::ForceStop => "force_stop",
            Self::PauseForInput { .. } => "pause_for_input",
            Self::ShowSubtitle { .. } => "show_subtitle",
        }
    }
}
