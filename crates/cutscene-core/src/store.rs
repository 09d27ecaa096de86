//! Key-value store abstraction used for persisted progress flags.

use crate::error::CutsceneError;

/// String-keyed integer store that survives process restarts once flushed.
pub trait KeyValueStore: Send {
    /// Reads the value for `key`, or `default` when it was never written.
    fn get_int(&self, key: &str, default: i64) -> i64;

    /// Writes a value. It is not durable until `flush` returns.
    ///
    /// # Errors
    ///
    /// Returns `CutsceneError::Persistence` if the write is rejected.
    fn set_int(&mut self, key: &str, value: i64) -> Result<(), CutsceneError>;

    /// Persists all pending writes.
    ///
    /// # Errors
    ///
    /// Returns `CutsceneError::Persistence` if the backing medium fails.
    fn flush(&mut self) -> Result<(), CutsceneError>;
}
