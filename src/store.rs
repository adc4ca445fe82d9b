//! Credential Store
//!
//! Key/value storage for the user's API key, the way the extension keeps it
//! in local storage. The settings surface writes it, the rewriter reads it.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::error::TypewellResult;

/// Storage key of the rewrite service credential
pub const API_KEY_NAME: &str = "HF_API_KEY";

pub trait CredentialStore: Send + Sync {
    /// Stored value; empty values read as absent
    fn get(&self, key: &str) -> TypewellResult<Option<String>>;

    /// Store a value, trimmed
    fn set(&self, key: &str, value: &str) -> TypewellResult<()>;

    fn remove(&self, key: &str) -> TypewellResult<()>;
}

/// JSON object on disk
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store under the user config directory
    pub fn open_default() -> Self {
        Self::new(default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> TypewellResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, values: &Map<String, Value>) -> TypewellResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(values)?)?;
        Ok(())
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> TypewellResult<Option<String>> {
        let _guard = self.lock.lock()?;
        let values = self.read()?;
        Ok(values
            .get(key)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
            .map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> TypewellResult<()> {
        let _guard = self.lock.lock()?;
        let mut values = self.read()?;
        values.insert(key.to_string(), Value::String(value.trim().to_string()));
        self.write(&values)?;
        debug!("Stored {} in {:?}", key, self.path);
        Ok(())
    }

    fn remove(&self, key: &str) -> TypewellResult<()> {
        let _guard = self.lock.lock()?;
        let mut values = self.read()?;
        if values.remove(key).is_some() {
            self.write(&values)?;
        }
        Ok(())
    }
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with an API key
    pub fn with_api_key(key: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.insert(API_KEY_NAME.to_string(), key.trim().to_string());
        }
        store
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> TypewellResult<Option<String>> {
        let values = self.values.lock()?;
        Ok(values.get(key).filter(|v| !v.is_empty()).cloned())
    }

    fn set(&self, key: &str, value: &str) -> TypewellResult<()> {
        self.values
            .lock()?
            .insert(key.to_string(), value.trim().to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> TypewellResult<()> {
        self.values.lock()?.remove(key);
        Ok(())
    }
}

pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("typewell")
        .join("storage.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path().join("nested/storage.json"));

        assert_eq!(store.get(API_KEY_NAME).unwrap(), None);
        store.set(API_KEY_NAME, "  hf_secret \n").unwrap();
        assert_eq!(store.get(API_KEY_NAME).unwrap().as_deref(), Some("hf_secret"));

        // A second handle sees the same file
        let reopened = FileStore::new(store.path());
        assert_eq!(reopened.get(API_KEY_NAME).unwrap().as_deref(), Some("hf_secret"));

        store.remove(API_KEY_NAME).unwrap();
        assert_eq!(reopened.get(API_KEY_NAME).unwrap(), None);
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path().join("storage.json"));
        store.set("theme", "dark").unwrap();
        store.set(API_KEY_NAME, "k").unwrap();
        store.remove(API_KEY_NAME).unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_empty_value_reads_as_absent() {
        let store = MemoryStore::new();
        store.set(API_KEY_NAME, "   ").unwrap();
        assert_eq!(store.get(API_KEY_NAME).unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(FileStore::new(path).get(API_KEY_NAME).is_err());
    }
}
