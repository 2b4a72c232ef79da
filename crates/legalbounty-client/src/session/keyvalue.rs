/*
[INPUT]:  String keys and values from the session layer
[OUTPUT]: Durable (or in-memory) key-value persistence
[POS]:    Session layer - storage abstraction behind the session store
[UPDATE]: When the storage format or backing medium changes
*/

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

/// Origin-scoped string key-value storage.
///
/// Mirrors the browser `localStorage` surface the session layer was designed
/// against, so tests and embedders can substitute an in-memory store. The
/// store is process-wide and single-writer-at-a-time by construction.
pub trait KeyValueStore: fmt::Debug + Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// In-memory store for tests and short-lived embedders
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// File-backed store: one JSON map per file, written atomically.
///
/// A missing or corrupt file reads as empty; corruption is logged, never
/// surfaced. Writes go through a temp file plus rename so a crash cannot
/// leave a half-written session behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let entries = Self::load(&path);
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn load(path: &Path) -> HashMap<String, String> {
        let Ok(content) = fs::read_to_string(path) else {
            return HashMap::new();
        };
        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), "discarding corrupt session file: {e}");
                HashMap::new()
            }
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> io::Result<()> {
        let content = serde_json::to_string_pretty(entries)?;

        // Atomic write: write to temp file then rename
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.save(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("access_token").is_none());

        store.set("access_token", "abc").unwrap();
        assert_eq!(store.get("access_token"), Some("abc".to_string()));

        store.remove("access_token").unwrap();
        assert!(store.get("access_token").is_none());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let store = FileStore::open(&path).unwrap();
            store.set("user", r#"{"id":"1"}"#).unwrap();
            store.set("access_token", "abc").unwrap();
            store.remove("access_token").unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("user"), Some(r#"{"id":"1"}"#.to_string()));
        assert!(reopened.get("access_token").is_none());
    }

    #[test]
    fn test_file_store_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.get("user").is_none());

        // The store is still writable after discarding the corrupt content
        store.set("user", "x").unwrap();
        assert_eq!(store.get("user"), Some("x".to_string()));
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("session.json")).unwrap();
        store.remove("nope").unwrap();
    }
}
