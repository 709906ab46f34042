//! ETSI GS QKD 014 Key Management Entity
//!
//! The KME issues symmetric keys to a master SAE for a named slave SAE and
//! later serves the same keys, by key ID, to those two parties only.
//!
//! ## Caller Identity
//!
//! The caller is never named by the payload. A TLS terminator performing
//! mutual authentication copies the client certificate common name into a
//! trusted header (`X-CERT-CN` by default); requests without it are refused.
//!
//! ## API Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /ready` - Readiness check with KME id and store backend
//! - `GET /api/v1/keys/{sae_id}/status` - Status descriptor
//! - `GET|POST /api/v1/keys/{sae_id}/enc_keys` - Issue keys (caller is master)
//! - `GET|POST /api/v1/keys/{sae_id}/dec_keys` - Retrieve keys (caller is slave)

pub mod api;
pub mod config;
pub mod core;
pub mod kme;
pub mod storage;

pub use api::handlers::AppState;
pub use api::{create_router, MAX_REQUEST_BODY_BYTES};
pub use config::{KmeConfig, StatusLimits};
pub use kme::KeyManagementEntity;
pub use storage::{KeyStore, MemoryStore, StorageError};

use std::sync::Arc;

/// Assemble shared state from configuration and an opened store
pub fn build_state(config: KmeConfig, store: Arc<dyn KeyStore>) -> Arc<AppState> {
    let kme = KeyManagementEntity::new(store)
        .with_default_key_size(config.default_key_size)
        .with_default_key_number(config.default_key_number);

    Arc::new(AppState { kme, config })
}
