//! Key creation and authorized retrieval on top of a [`KeyStore`]

use kme_core::{
    generate_key_id, generate_key_material, KeyContainer, KeyIdRef, KeyRecord, KmeError,
    DEFAULT_KEY_NUMBER, DEFAULT_KEY_SIZE_BITS,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::{authorize, validate_key_request, AccessCheck};
use crate::storage::KeyStore;

/// The key lifecycle engine
///
/// Stateless apart from the store: the caller identity arrives with every
/// call and nothing about callers is remembered between requests.
#[derive(Debug, Clone)]
pub struct KeyManagementEntity {
    store: Arc<dyn KeyStore>,
    default_key_size: u32,
    default_key_number: u32,
}

impl KeyManagementEntity {
    /// Create an entity with the standard defaults (256-bit keys, one per request)
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self {
            store,
            default_key_size: DEFAULT_KEY_SIZE_BITS,
            default_key_number: DEFAULT_KEY_NUMBER,
        }
    }

    /// Override the key size used when a request does not name one
    pub fn with_default_key_size(mut self, size: u32) -> Self {
        self.default_key_size = size;
        self
    }

    /// Override the key count used when a request does not name one
    pub fn with_default_key_number(mut self, number: u32) -> Self {
        self.default_key_number = number;
        self
    }

    pub fn default_key_size(&self) -> u32 {
        self.default_key_size
    }

    pub fn store(&self) -> &Arc<dyn KeyStore> {
        &self.store
    }

    /// Issue `number` keys of `size` bits for `master`, shared with `slave`
    ///
    /// Keys are returned in creation order. Each one is stored before the
    /// next is generated; a store failure aborts the request.
    pub async fn create(
        &self,
        master: &str,
        slave: &str,
        size: Option<u32>,
        number: Option<u32>,
    ) -> Result<Vec<KeyContainer>, KmeError> {
        let size = size.unwrap_or(self.default_key_size);
        let number = number.unwrap_or(self.default_key_number);
        validate_key_request(size, number)?;

        let mut containers = Vec::new();
        for _ in 0..number {
            let key_id = generate_key_id();
            let record = KeyRecord::new(master, slave, generate_key_material(size));
            self.store.put(&key_id, &record).await?;
            debug!(key_id = %key_id, master = %master, slave = %slave, "Created key");
            containers.push(record.to_container(key_id));
        }

        info!(
            master = %master,
            slave = %slave,
            size = size,
            number = number,
            "Issued keys"
        );

        Ok(containers)
    }

    /// Return the keys named by `key_refs`, in request order
    ///
    /// All or nothing: the first reference that carries an extension, is
    /// unknown, or fails the access check aborts the whole batch.
    pub async fn retrieve(
        &self,
        required_master: &str,
        required_slave: &str,
        key_refs: &[KeyIdRef],
    ) -> Result<Vec<KeyContainer>, KmeError> {
        let mut containers = Vec::with_capacity(key_refs.len());

        for key_ref in key_refs {
            if key_ref.has_extensions() {
                warn!(
                    key_id = %key_ref.key_id,
                    extensions = ?key_ref.extensions.keys().collect::<Vec<_>>(),
                    "Key ID extensions are not supported"
                );
                return Err(KmeError::UnsupportedExtension(key_ref.key_id.clone()));
            }

            let record = self
                .store
                .get(&key_ref.key_id)
                .await?
                .ok_or_else(|| KmeError::KeyNotFound(key_ref.key_id.clone()))?;

            authorize(
                &AccessCheck::new(&key_ref.key_id, required_master, required_slave),
                &record,
            )?;

            containers.push(record.to_container(key_ref.key_id.clone()));
        }

        info!(
            master = %required_master,
            slave = %required_slave,
            count = containers.len(),
            "Delivered keys"
        );

        Ok(containers)
    }
}
