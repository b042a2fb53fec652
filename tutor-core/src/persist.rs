//! Durable storage for named JSON entries.
//!
//! The helpers here report failures as [`PersistError`]; deciding whether a
//! failure matters is left to the caller (the cache degrades to empty).

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Entry holding the subject -> topic list mapping.
pub const TOPICS_ENTRY: &str = "topics";

/// Entry holding the subject -> topic -> lesson text mapping.
pub const THEORY_ENTRY: &str = "theory";

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A place to keep named, opaque text entries.
pub trait Storage: Send + Sync {
    /// Read an entry. A missing entry is `Ok(None)`.
    fn read(&self, name: &str) -> Result<Option<String>, PersistError>;

    /// Replace an entry with `contents`.
    fn write(&self, name: &str, contents: &str) -> Result<(), PersistError>;
}

/// Stores each entry as `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `name`.
    pub fn entry_path(&self, name: &str) -> PathBuf {
        let sanitized = name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect::<String>();
        self.dir.join(format!("{sanitized}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, name: &str) -> Result<Option<String>, PersistError> {
        let path = self.entry_path(name);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn write(&self, name: &str, contents: &str) -> Result<(), PersistError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.entry_path(name), contents)?;
        Ok(())
    }
}

/// Keeps entries in process memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage that already holds `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Snapshot of one entry's raw contents.
    pub fn raw(&self, name: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(name).cloned())
    }
}

impl Storage for MemoryStorage {
    fn read(&self, name: &str) -> Result<Option<String>, PersistError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| PersistError::Unavailable("memory storage poisoned".to_string()))?;
        Ok(entries.get(name).cloned())
    }

    fn write(&self, name: &str, contents: &str) -> Result<(), PersistError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| PersistError::Unavailable("memory storage poisoned".to_string()))?;
        entries.insert(name.to_string(), contents.to_string());
        Ok(())
    }
}

/// Load a named mapping; a missing entry yields `T::default()`.
pub fn load_map<T>(storage: &dyn Storage, name: &str) -> Result<T, PersistError>
where
    T: DeserializeOwned + Default,
{
    match storage.read(name)? {
        Some(contents) => Ok(serde_json::from_str(&contents)?),
        None => Ok(T::default()),
    }
}

/// Serialize a mapping and write it in full under `name`.
pub fn save_map<T>(storage: &dyn Storage, name: &str, map: &T) -> Result<(), PersistError>
where
    T: Serialize,
{
    let contents = serde_json::to_string_pretty(map)?;
    storage.write(name, &contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_entry_path_sanitizes_name() {
        let storage = FileStorage::new("/data");
        let path = storage.entry_path("my topics!");
        assert!(path.to_string_lossy().ends_with("my_topics_.json"));
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = FileStorage::new(temp_dir.path().join("never-created"));
        assert!(storage.read(TOPICS_ENTRY).unwrap().is_none());
    }

    #[test]
    fn test_file_round_trip_preserves_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = FileStorage::new(temp_dir.path().join("nested").join("cache"));

        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        map.insert(
            "physics".to_string(),
            vec!["Waves".to_string(), "Kinematics".to_string(), "Optics".to_string()],
        );

        save_map(&storage, TOPICS_ENTRY, &map).expect("Save should succeed");
        assert!(storage.entry_path(TOPICS_ENTRY).exists());

        let loaded: BTreeMap<String, Vec<String>> =
            load_map(&storage, TOPICS_ENTRY).expect("Load should succeed");
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_corrupt_entry_is_json_error() {
        let storage = MemoryStorage::with_entries([(THEORY_ENTRY, "{not json")]);
        let result: Result<BTreeMap<String, String>, _> = load_map(&storage, THEORY_ENTRY);
        assert!(matches!(result, Err(PersistError::Json(_))));
    }

    #[test]
    fn test_missing_entry_loads_default() {
        let storage = MemoryStorage::new();
        let loaded: BTreeMap<String, String> = load_map(&storage, THEORY_ENTRY).unwrap();
        assert!(loaded.is_empty());
    }
}
