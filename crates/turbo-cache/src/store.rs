//! Raw key-value backends.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use tracing::{debug, warn};

use crate::CacheError;

/// A byte-oriented key-value store.
///
/// Implementations must be safe to share between threads. Writes are
/// last-writer-wins; no backend offers compare-and-swap.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }

    /// List all keys.
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

fn poisoned<T>(_: T) -> CacheError {
    CacheError::StoreError("lock poisoned".to_string())
}

/// Process-local store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries.read().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.entries
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().map_err(poisoned)?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let entries = self.entries.read().map_err(poisoned)?;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// Store backed by a single JSON document on disk.
///
/// The document is an object mapping each key to its string value, the same
/// shape a browser's local storage has. Every write rewrites the document
/// through a temporary file and a rename, so readers never observe a
/// half-written file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// The parent directory is created if needed; the file itself is only
    /// written on the first `set`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| CacheError::OpenError(format!("{}: {}", parent.display(), e)))?;
        }
        if path.is_dir() {
            return Err(CacheError::OpenError(format!(
                "{} is a directory",
                path.display()
            )));
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>, CacheError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        serde_json::from_slice(&raw)
            .map_err(|e| CacheError::CorruptDocument(format!("{}: {}", self.path.display(), e)))
    }

    /// The document to rewrite on `set`. A corrupt document is replaced,
    /// which drops every key it held.
    fn document_for_write(&self) -> Result<BTreeMap<String, String>, CacheError> {
        match self.read_document() {
            Err(CacheError::CorruptDocument(reason)) => {
                warn!(path = %self.path.display(), %reason, "Replacing corrupt store document");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec_pretty(document)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), keys = document.len(), "Wrote store document");
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.read_document()?.remove(key).map(String::into_bytes))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let value = std::str::from_utf8(value).map_err(|e| {
            CacheError::StoreError(format!("value for {} is not UTF-8: {}", key, e))
        })?;
        let _guard = self.write_lock.lock().map_err(poisoned)?;
        let mut document = self.document_for_write()?;
        document.insert(key.to_string(), value.to_string());
        self.write_document(&document)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let _guard = self.write_lock.lock().map_err(poisoned)?;
        let mut document = self.read_document()?;
        if document.remove(key).is_some() {
            self.write_document(&document)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.read_document()?.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_crud() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("b", b"2").unwrap();
        store.set("a", b"1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some(b"1".to_vec()));
        assert!(store.exists("b").unwrap());
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);

        store.delete("a").unwrap();
        store.delete("a").unwrap();
        assert!(!store.exists("a").unwrap());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("@RocketShoes:cart").unwrap(), None);
        store.set("@RocketShoes:cart", b"[]").unwrap();
        store.set("other", br#"{"x":1}"#).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("@RocketShoes:cart").unwrap(), Some(b"[]".to_vec()));
        assert_eq!(reopened.keys().unwrap(), vec!["@RocketShoes:cart", "other"]);

        reopened.delete("other").unwrap();
        assert!(!store.exists("other").unwrap());
    }

    #[test]
    fn test_file_store_rejects_non_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("s.json")).unwrap();
        assert!(matches!(
            store.set("k", &[0xff, 0xfe]),
            Err(CacheError::StoreError(_))
        ));
    }

    #[test]
    fn test_file_store_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        fs::write(&path, r#"{"@RocketShoes:cart": "[tru"#).unwrap();

        let store = FileStore::open(&path).unwrap();
        let err = store.get("@RocketShoes:cart").unwrap_err();
        assert!(matches!(err, CacheError::CorruptDocument(_)));
        assert!(err.is_corrupt_value());

        // The next write replaces the document.
        store.set("@RocketShoes:cart", b"[]").unwrap();
        assert_eq!(store.get("@RocketShoes:cart").unwrap(), Some(b"[]".to_vec()));
        assert_eq!(store.keys().unwrap(), vec!["@RocketShoes:cart"]);
    }

    #[test]
    fn test_file_store_open_on_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FileStore::open(dir.path()),
            Err(CacheError::OpenError(_))
        ));
    }
}
