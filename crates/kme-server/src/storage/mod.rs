//! Storage abstraction for key records
//!
//! The KME only needs string-keyed get/set of serialized key records, so a
//! single trait covers both backends:
//! - in-memory (default): single process, lost on restart
//! - PostgreSQL (`postgres` feature): a networked key-value table shared by
//!   every KME worker pointed at the same database
//!
//! Records are written once and never mutated, so no backend needs more than
//! single-key atomicity.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

use async_trait::async_trait;
use kme_core::{KeyRecord, KmeError};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::info;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<KmeError> for StorageError {
    fn from(err: KmeError) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<StorageError> for KmeError {
    fn from(err: StorageError) -> Self {
        KmeError::Storage(err.to_string())
    }
}

/// Storage backend for key records
///
/// Implementations must be thread-safe and support concurrent access. Call
/// sites never branch on the concrete backend.
#[async_trait]
pub trait KeyStore: Send + Sync + Debug {
    /// Store a record under its key ID, replacing any previous value
    async fn put(&self, key_id: &str, record: &KeyRecord) -> Result<(), StorageError>;

    /// Fetch a record by key ID
    async fn get(&self, key_id: &str) -> Result<Option<KeyRecord>, StorageError>;

    /// Short backend name for readiness reporting
    fn backend(&self) -> &'static str;
}

/// Open the backend selected by `database_url`
///
/// Without a URL the in-memory store is used. A URL given to a build without
/// the `postgres` feature is a connection error, never a memory fallback.
pub async fn connect(database_url: Option<&str>) -> Result<Arc<dyn KeyStore>, StorageError> {
    match database_url {
        #[cfg(feature = "postgres")]
        Some(url) => {
            let store = PostgresStore::new(url).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "postgres"))]
        Some(_) => Err(StorageError::Connection(
            "KME_DATABASE_URL is set but the postgres feature is not enabled".into(),
        )),
        None => {
            info!("Using in-memory key store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_without_url_uses_memory() {
        let store = connect(None).await.unwrap();
        assert_eq!(store.backend(), "memory");
    }

    #[cfg(not(feature = "postgres"))]
    #[tokio::test]
    async fn test_connect_with_url_requires_postgres_feature() {
        let err = connect(Some("postgres://kme@db/kme")).await.unwrap_err();
        assert!(matches!(err, StorageError::Connection(msg) if msg.contains("postgres feature")));
    }

    #[test]
    fn test_storage_error_becomes_kme_storage_error() {
        let err: KmeError = StorageError::Connection("refused".into()).into();
        assert!(matches!(err, KmeError::Storage(msg) if msg.contains("refused")));
    }
}
