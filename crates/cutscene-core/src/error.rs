//! Domain error types.

use thiserror::Error;

/// Top-level error for cutscene orchestration.
///
/// None of these are fatal to the host: the director reports them and
/// degrades to a no-op or a safe return to idle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CutsceneError {
    /// No sequence is registered under the requested key.
    #[error("sequence not found: {0}")]
    SequenceNotFound(String),

    /// A sequence key was empty or whitespace.
    #[error("sequence key must not be empty")]
    EmptyKey,

    /// A play request arrived while another sequence was active.
    #[error("cutscene '{active}' is already active; rejected '{requested}'")]
    Busy {
        /// The key that was requested.
        requested: String,
        /// The key currently holding the director.
        active: String,
    },

    /// An operation was requested in a phase that does not allow it.
    #[error("cannot {operation} while {phase}")]
    InvalidPhase {
        /// The rejected operation.
        operation: &'static str,
        /// The phase the director was in.
        phase: String,
    },

    /// A one-shot sequence was requested after it had already been played.
    #[error("sequence '{0}' has already been played")]
    AlreadyPlayed(String),

    /// The playback engine refused or failed an operation.
    #[error("playback engine error: {0}")]
    Engine(String),

    /// The key-value store could not read or persist a value.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Invalid input or configuration.
    #[error("validation error: {0}")]
    Validation(String),
}

impl CutsceneError {
    /// Machine-readable code used in reported events.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::SequenceNotFound(_) => "sequence_not_found",
            Self::EmptyKey => "empty_key",
            Self::Busy { .. } => "busy",
            Self::InvalidPhase { .. } => "invalid_phase",
            Self::AlreadyPlayed(_) => "already_played",
            Self::Engine(_) => "engine_error",
            Self::Persistence(_) => "persistence_error",
            Self::Validation(_) => "validation_error",
        }
    }
}
