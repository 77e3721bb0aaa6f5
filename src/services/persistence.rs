//! Session persistence
//!
//! The whole document set is stored as one JSON object mapping document name
//! to content, written under a single key. Each save replaces the previous
//! value wholesale; there is no per-document merging.
//!
//! Storage is a small key/value abstraction so the controller can run
//! against files in production and an in-memory map in tests.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};
use thiserror::Error;

/// Key holding the name→content mapping
pub const TABS_KEY: &str = "tabs_data";

/// Key used by older sessions, which held a single document's source
pub const LEGACY_KEY: &str = "python_code";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("stored session is corrupt: {0}")]
    Corrupt(String),
}

/// Durable key/value storage for serialized session state
pub trait StateStorage: Send {
    fn read(&self, key: &str) -> io::Result<Option<String>>;

    /// Replace the value for `key` in one atomic step
    fn write(&mut self, key: &str, value: &str) -> io::Result<()>;

    fn remove(&mut self, key: &str) -> io::Result<()>;
}

/// One file per key inside a storage directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn atomic_write(&self, target: &Path, content: &[u8]) -> io::Result<()> {
        let temp_path = target.with_extension("tmp");

        let mut file = File::create(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, target)?;

        Ok(())
    }
}

impl StateStorage for FileStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        self.atomic_write(&self.path_for(key), value.as_bytes())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-memory storage; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StateStorage for MemoryStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.get(key))
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.insert(key, value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Load/save of the full document set
pub struct SessionPersistence {
    storage: Box<dyn StateStorage>,
}

impl SessionPersistence {
    pub fn new(storage: Box<dyn StateStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory(storage: MemoryStorage) -> Self {
        Self::new(Box::new(storage))
    }

    /// Serialize and store the full ordered mapping, replacing any prior value
    pub fn save(&mut self, entries: &[(String, String)]) -> Result<(), PersistError> {
        let map: Map<String, Value> = entries
            .iter()
            .map(|(name, content)| (name.clone(), Value::String(content.clone())))
            .collect();
        let json = serde_json::to_string(&Value::Object(map))
            .map_err(|e| PersistError::Corrupt(e.to_string()))?;
        self.storage.write(TABS_KEY, &json)?;
        tracing::debug!("Saved {} documents", entries.len());
        Ok(())
    }

    /// Stored mapping in saved order, or None on first run
    pub fn load(&self) -> Result<Option<Vec<(String, String)>>, PersistError> {
        let Some(raw) = self.storage.read(TABS_KEY)? else {
            return Ok(None);
        };
        let value: Value =
            serde_json::from_str(&raw).map_err(|e| PersistError::Corrupt(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(PersistError::Corrupt(
                "expected an object of name to content".to_string(),
            ));
        };

        map.into_iter()
            .map(|(name, content)| match content {
                Value::String(text) => Ok((name, text)),
                other => Err(PersistError::Corrupt(format!(
                    "content of {name:?} is {other}, not a string"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Single-document source saved by older sessions
    pub fn load_legacy(&self) -> Result<Option<String>, PersistError> {
        Ok(self.storage.read(LEGACY_KEY)?)
    }

    /// Drop the legacy value once it has been migrated
    pub fn clear_legacy(&mut self) -> Result<(), PersistError> {
        Ok(self.storage.remove(LEGACY_KEY)?)
    }
}
