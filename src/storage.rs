//! On-disk save slots and autosave
//!
//! A [`SaveStore`] owns one directory holding two JSON files:
//! `saves.json` (an array of [`SaveRecord`]) and `autosave.json`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::session::{now_ms, Snapshot};

/// Format version written into every record
pub const SAVE_VERSION: u32 = 1;

const SAVES_FILE: &str = "saves.json";
const AUTOSAVE_FILE: &str = "autosave.json";

/// A named save slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub id: String,
    pub name: String,
    pub created_at_ms: u64,
    pub version: u32,
    pub snapshot: Snapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Autosave {
    version: u32,
    updated_at_ms: u64,
    snapshot: Snapshot,
}

#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All save slots, oldest first
    pub fn list(&self) -> Result<Vec<SaveRecord>, StorageError> {
        Ok(read_json(&self.dir.join(SAVES_FILE))?.unwrap_or_default())
    }

    pub fn save(&self, name: &str, snapshot: Snapshot) -> Result<SaveRecord, StorageError> {
        let mut records = self.list()?;
        let created_at_ms = now_ms();
        let base = format!("save-{created_at_ms}");
        let mut id = base.clone();
        let mut suffix = 1;
        while records.iter().any(|r| r.id == id) {
            id = format!("{base}-{suffix}");
            suffix += 1;
        }

        let record = SaveRecord {
            id,
            name: name.to_string(),
            created_at_ms,
            version: SAVE_VERSION,
            snapshot,
        };
        records.push(record.clone());
        self.write_saves(&records)?;
        info!(id = %record.id, name, "game saved");
        Ok(record)
    }

    pub fn load(&self, id: &str) -> Result<Snapshot, StorageError> {
        self.list()?
            .into_iter()
            .find(|r| r.id == id)
            .map(|r| r.snapshot)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    pub fn delete(&self, id: &str) -> Result<(), StorageError> {
        let mut records = self.list()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(StorageError::NotFound(id.to_string()));
        }
        self.write_saves(&records)
    }

    /// Remove every save slot and the autosave
    pub fn clear(&self) -> Result<(), StorageError> {
        for file in [SAVES_FILE, AUTOSAVE_FILE] {
            match fs::remove_file(self.dir.join(file)) {
                Err(err) if err.kind() != io::ErrorKind::NotFound => return Err(err.into()),
                _ => {}
            }
        }
        Ok(())
    }

    pub fn autosave(&self, snapshot: Snapshot) -> Result<(), StorageError> {
        let autosave = Autosave {
            version: SAVE_VERSION,
            updated_at_ms: now_ms(),
            snapshot,
        };
        write_json(&self.dir.join(AUTOSAVE_FILE), &autosave)?;
        debug!(moves = autosave.snapshot.history.len(), "autosaved");
        Ok(())
    }

    pub fn load_autosave(&self) -> Result<Option<Snapshot>, StorageError> {
        let autosave: Option<Autosave> = read_json(&self.dir.join(AUTOSAVE_FILE))?;
        Ok(autosave.map(|a| a.snapshot))
    }

    fn write_saves(&self, records: &[SaveRecord]) -> Result<(), StorageError> {
        write_json(&self.dir.join(SAVES_FILE), &records)
    }
}

/// `None` when the file does not exist
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::GameSession;
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let mut session = GameSession::default();
        session.play(7, 7).unwrap();
        session.play_ai(8, 8, 310.0).unwrap();
        session.snapshot()
    }

    #[test]
    fn test_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path());
        assert!(store.list().unwrap().is_empty());
        assert!(store.load_autosave().unwrap().is_none());
        assert!(matches!(store.load("nope"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_save_load_delete() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path().join("nested"));
        let snapshot = sample_snapshot();

        let first = store.save("opening", snapshot.clone()).unwrap();
        let second = store.save("opening again", snapshot.clone()).unwrap();
        assert_ne!(first.id, second.id, "Ids must be unique");
        assert_eq!(first.version, SAVE_VERSION);

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "opening");

        let loaded = store.load(&first.id).unwrap();
        assert_eq!(loaded, snapshot);
        let restored = GameSession::restore(&loaded).unwrap();
        assert_eq!(restored.history().len(), 2);

        store.delete(&first.id).unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
        assert!(matches!(store.delete(&first.id), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_autosave_roundtrip_and_clear() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path());
        let snapshot = sample_snapshot();

        store.autosave(snapshot.clone()).unwrap();
        assert_eq!(store.load_autosave().unwrap(), Some(snapshot.clone()));

        store.save("slot", snapshot).unwrap();
        store.clear().unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(store.load_autosave().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SAVES_FILE), "{ not json").unwrap();
        let store = SaveStore::new(dir.path());
        assert!(matches!(store.list(), Err(StorageError::Json(_))));
    }
}
