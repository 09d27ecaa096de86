//! Test key-value stores.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use cutscene_core::error::CutsceneError;
use cutscene_core::store::KeyValueStore;

#[derive(Debug, Default)]
struct StoreData {
    pending: BTreeMap<String, i64>,
    durable: BTreeMap<String, i64>,
    flushes: usize,
}

/// In-memory store that distinguishes written values from flushed ones.
/// [`MemoryStore::restart`] simulates a process restart: only flushed values
/// survive. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<StoreData>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh store holding only the values that were flushed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn restart(&self) -> Self {
        let durable = self.data.lock().unwrap().durable.clone();
        Self {
            data: Arc::new(Mutex::new(StoreData {
                pending: durable.clone(),
                durable,
                flushes: 0,
            })),
        }
    }

    /// Value that would survive a restart.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn durable_value(&self, key: &str) -> Option<i64> {
        self.data.lock().unwrap().durable.get(key).copied()
    }

    /// Number of successful `flush` calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.data.lock().unwrap().flushes
    }
}

impl KeyValueStore for MemoryStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.data
            .lock()
            .unwrap()
            .pending
            .get(key)
            .copied()
            .unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), CutsceneError> {
        self.data
            .lock()
            .unwrap()
            .pending
            .insert(key.to_owned(), value);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CutsceneError> {
        let mut data = self.data.lock().unwrap();
        data.durable = data.pending.clone();
        data.flushes += 1;
        Ok(())
    }
}

/// A store that reads every key as its default and rejects every write.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get_int(&self, _key: &str, default: i64) -> i64 {
        default
    }

    fn set_int(&mut self, _key: &str, _value: i64) -> Result<(), CutsceneError> {
        Err(CutsceneError::Persistence("store is read-only".into()))
    }

    fn flush(&mut self) -> Result<(), CutsceneError> {
        Err(CutsceneError::Persistence("store is read-only".into()))
    }
}
