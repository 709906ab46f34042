//! In-memory storage backend
//!
//! Default storage implementation using an in-memory hashmap of serialized
//! records. Suitable for development and single-instance deployments.
//! Data is lost on restart.

use async_trait::async_trait;
use kme_core::KeyRecord;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use super::{KeyStore, StorageError};

/// In-memory key store implementation
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, String>>, StorageError> {
        self.records
            .read()
            .map_err(|_| StorageError::Database("key store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, String>>, StorageError> {
        self.records
            .write()
            .map_err(|_| StorageError::Database("key store lock poisoned".into()))
    }
}

#[async_trait]
impl KeyStore for MemoryStore {
    async fn put(&self, key_id: &str, record: &KeyRecord) -> Result<(), StorageError> {
        let json = record.to_json()?;
        let mut records = self.write()?;
        records.insert(key_id.to_string(), json);
        debug!(key_id = %key_id, "Stored key record");
        Ok(())
    }

    async fn get(&self, key_id: &str) -> Result<Option<KeyRecord>, StorageError> {
        let records = self.read()?;
        records
            .get(key_id)
            .map(|json| KeyRecord::from_json(json).map_err(StorageError::from))
            .transpose()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryStore::new();
        let record = KeyRecord::new("sae-A", "sae-B", "AAAA");

        store.put("id-1", &record).await.unwrap();

        let retrieved = store.get("id-1").await.unwrap();
        assert_eq!(retrieved, Some(record));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("nope").await.unwrap().is_none());
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryStore::new();
        store.put("id-1", &KeyRecord::new("a", "b", "AAAA")).await.unwrap();
        store.put("id-1", &KeyRecord::new("c", "d", "BBBB")).await.unwrap();

        let record = store.get("id-1").await.unwrap().unwrap();
        assert_eq!(record.master(), "c");
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_reported_everywhere() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.records.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(StorageError::Database(_))));
        assert!(matches!(store.is_empty(), Err(StorageError::Database(_))));
        assert!(store.get("id-1").await.is_err());
        assert!(store
            .put("id-1", &KeyRecord::new("a", "b", "AAAA"))
            .await
            .is_err());
    }
}
