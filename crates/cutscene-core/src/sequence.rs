//! Sequence handles and their named registrations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque reference to a pre-authored sequence the playback engine can run.
///
/// The director never looks inside a handle; it only hands it to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceHandle(String);

impl SequenceHandle {
    /// Creates a handle for the given asset identifier.
    #[must_use]
    pub fn new(asset: impl Into<String>) -> Self {
        Self(asset.into())
    }

    /// Returns the asset identifier.
    #[must_use]
    pub fn asset(&self) -> &str {
        &self.0
    }

    /// A handle with no asset behind it. Such handles are never registered.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for SequenceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn default_uses_fade() -> bool {
    true
}

/// A sequence registered under a lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedSequence {
    /// Lookup key, unique within a registry.
    pub key: String,
    /// The sequence to play.
    pub handle: SequenceHandle,
    /// Whether the screen fades out and back in around this sequence.
    #[serde(default = "default_uses_fade")]
    pub uses_fade: bool,
}

impl NamedSequence {
    /// Creates a named sequence that fades in and out.
    #[must_use]
    pub fn new(key: impl Into<String>, handle: SequenceHandle) -> Self {
        Self {
            key: key.into(),
            handle,
            uses_fade: true,
        }
    }

    /// Disables the start and end fades for this sequence.
    #[must_use]
    pub fn without_fade(mut self) -> Self {
        self.uses_fade = false;
        self
    }
}
