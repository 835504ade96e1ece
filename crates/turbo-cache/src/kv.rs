//! Typed cache over a raw key-value store.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::{CacheError, FileStore, KvStore, MemoryStore};

/// Type-safe cache with automatic JSON serialization.
///
/// Works for any type that implements `Serialize` and `DeserializeOwned`.
/// Clones share the same backing store.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KvStore>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl Cache {
    /// Wrap an existing store.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Open a process-local cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::in_memory();
    /// ```
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Open a cache persisted to a JSON document at `path`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open_file("/var/lib/storefront/storage.json")?;
    /// ```
    pub fn open_file(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Ok(Self::new(Arc::new(FileStore::open(path)?)))
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cart: Option<Cart> = cache.get("@RocketShoes:cart")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set("@RocketShoes:cart", &cart)?;
    /// ```
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        #[serde(rename = "productId")]
        product_id: i64,
        amount: u32,
    }

    #[test]
    fn test_typed_round_trip() {
        let cache = Cache::in_memory();
        let entries = vec![
            Entry {
                product_id: 1,
                amount: 2,
            },
            Entry {
                product_id: 3,
                amount: 1,
            },
        ];
        cache.set("cart", &entries).unwrap();

        let loaded: Option<Vec<Entry>> = cache.get("cart").unwrap();
        assert_eq!(loaded, Some(entries));
        assert!(cache.exists("cart").unwrap());
        assert_eq!(cache.keys().unwrap(), vec!["cart"]);
    }

    #[test]
    fn test_missing_key_is_none() {
        let cache = Cache::in_memory();
        let loaded: Option<Vec<Entry>> = cache.get("cart").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_undecodable_value_is_flagged() {
        let store = Arc::new(MemoryStore::new());
        store.set("cart", b"{not json").unwrap();
        let cache = Cache::new(store);

        let err = cache.get::<Vec<Entry>>("cart").unwrap_err();
        assert!(err.is_corrupt_value());
    }

    #[test]
    fn test_clones_share_store() {
        let cache = Cache::in_memory();
        let clone = cache.clone();
        clone.set("k", &42u32).unwrap();
        assert_eq!(cache.get::<u32>("k").unwrap(), Some(42));

        cache.delete("k").unwrap();
        assert!(!clone.exists("k").unwrap());
    }

    #[test]
    fn test_file_backed_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        Cache::open_file(&path)
            .unwrap()
            .set("cart", &vec![Entry { product_id: 9, amount: 4 }])
            .unwrap();

        let reopened = Cache::open_file(&path).unwrap();
        let loaded: Vec<Entry> = reopened.get("cart").unwrap().unwrap();
        assert_eq!(loaded, vec![Entry { product_id: 9, amount: 4 }]);
    }
}
