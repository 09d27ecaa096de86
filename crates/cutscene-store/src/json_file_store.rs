//! JSON save-file implementation of the `KeyValueStore` trait.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cutscene_core::error::CutsceneError;
use cutscene_core::store::KeyValueStore;

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SaveFile {
    version: u32,
    values: BTreeMap<String, i64>,
}

/// Integer flags kept in memory and written to a JSON file on `flush`.
///
/// Writes go to a sibling `.tmp` file that is then renamed over the save,
/// so an interrupted flush leaves the previous save intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, i64>,
    dirty: bool,
}

impl JsonFileStore {
    /// Opens the save at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns `CutsceneError::Persistence` if the file exists but cannot be
    /// read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CutsceneError> {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(bytes) => {
                let save: SaveFile = serde_json::from_slice(&bytes).map_err(|e| {
                    CutsceneError::Persistence(format!("corrupt save {}: {e}", path.display()))
                })?;
                save.values
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(io_error(&path, &e)),
        };
        info!(path = %path.display(), entries = values.len(), "save file opened");
        Ok(Self {
            path,
            values,
            dirty: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether there are writes not yet flushed.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), CutsceneError> {
        if self.values.insert(key.to_owned(), value) != Some(value) {
            self.dirty = true;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CutsceneError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, &e))?;
        }
        let save = SaveFile {
            version: FORMAT_VERSION,
            values: self.values.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&save)
            .map_err(|e| CutsceneError::Persistence(format!("serialization failed: {e}")))?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, bytes).map_err(|e| io_error(&tmp_path, &e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| io_error(&self.path, &e))?;

        self.dirty = false;
        debug!(path = %self.path.display(), entries = self.values.len(), "save file flushed");
        Ok(())
    }
}

fn io_error(path: &Path, err: &io::Error) -> CutsceneError {
    CutsceneError::Persistence(format!("{}: {err}", path.display()))
}
