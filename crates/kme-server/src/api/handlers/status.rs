//! ETSI `status` method

use serde::{Deserialize, Serialize};

use crate::api::handlers::keys::AppState;

/// ETSI GS QKD 014 `Status` data format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(rename = "source_KME_ID")]
    pub source_kme_id: String,
    #[serde(rename = "target_KME_ID")]
    pub target_kme_id: String,
    #[serde(rename = "master_SAE_ID")]
    pub master_sae_id: String,
    #[serde(rename = "slave_SAE_ID")]
    pub slave_sae_id: String,
    pub key_size: u32,
    pub stored_key_count: u64,
    pub max_key_count: u64,
    pub max_key_per_request: u32,
    pub max_key_size: u32,
    pub min_key_size: u32,
    #[serde(rename = "max_SAE_ID_count")]
    pub max_sae_id_count: u32,
}

/// Build the status descriptor for `caller` (as master) and `target` (as slave)
///
/// Pure lookup: calling it records nothing about the caller.
pub fn status_descriptor(state: &AppState, caller: &str, target: &str) -> StatusResponse {
    let limits = &state.config.limits;

    StatusResponse {
        source_kme_id: state.config.kme_id.clone(),
        target_kme_id: limits.target_kme_id.clone(),
        master_sae_id: caller.to_string(),
        slave_sae_id: target.to_string(),
        key_size: state.kme.default_key_size(),
        stored_key_count: limits.stored_key_count,
        max_key_count: limits.max_key_count,
        max_key_per_request: limits.max_key_per_request,
        max_key_size: limits.max_key_size,
        min_key_size: limits.min_key_size,
        max_sae_id_count: limits.max_sae_id_count,
    }
}
