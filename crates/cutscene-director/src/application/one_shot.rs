//! Persisted record of completed one-shot timelines.

use std::fmt;

use cutscene_core::error::CutsceneError;
use cutscene_core::store::KeyValueStore;
use tracing::info;

const PLAYED: i64 = 1;

/// Remembers which timeline keys have completed, across restarts.
///
/// Keys share the registry's key space and are stored as-is.
pub struct OneShotGate {
    store: Box<dyn KeyValueStore>,
}

impl OneShotGate {
    /// Wraps a key-value store.
    #[must_use]
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Whether `key` has been recorded as played.
    #[must_use]
    pub fn has_played(&self, key: &str) -> bool {
        self.store.get_int(key, 0) == PLAYED
    }

    /// Records `key` as played and flushes before returning.
    ///
    /// # Errors
    ///
    /// Returns `CutsceneError::EmptyKey` for a blank key and
    /// `CutsceneError::Persistence` when the store cannot write or flush.
    pub fn mark_played(&mut self, key: &str) -> Result<(), CutsceneError> {
        if key.trim().is_empty() {
            return Err(CutsceneError::EmptyKey);
        }
        self.store.set_int(key, PLAYED)?;
        self.store.flush()?;
        info!(key, "one-shot timeline recorded as played");
        Ok(())
    }
}

impl fmt::Debug for OneShotGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneShotGate").finish_non_exhaustive()
    }
}
