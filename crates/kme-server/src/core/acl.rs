//! Two-party access control for key retrieval
//!
//! A retrieval names a required master and a required slave. The stored
//! master must match the required master exactly, while the required slave
//! only has to be one of the two parties bound at creation. Because the
//! master is itself a bound party, the slave side of the check is satisfied
//! by either original SAE. This asymmetry is kept as-is.

use kme_core::{KeyRecord, KmeError};
use tracing::warn;

/// The ephemeral `(required_master, required_slave, key_id)` triple of a
/// retrieval
#[derive(Debug, Clone, Copy)]
pub struct AccessCheck<'a> {
    pub key_id: &'a str,
    pub required_master: &'a str,
    pub required_slave: &'a str,
}

impl<'a> AccessCheck<'a> {
    pub fn new(key_id: &'a str, required_master: &'a str, required_slave: &'a str) -> Self {
        Self {
            key_id,
            required_master,
            required_slave,
        }
    }
}

/// Authorize a retrieval against the stored record
///
/// # Returns
/// * `Ok(())` if the stored master equals `required_master` and
///   `required_slave` is a bound party
/// * `Err(KmeError::MasterMismatch)` if the master differs
/// * `Err(KmeError::NotAuthorized)` if the slave is not a bound party
pub fn authorize(check: &AccessCheck<'_>, record: &KeyRecord) -> Result<(), KmeError> {
    if record.master() != check.required_master {
        warn!(
            key_id = %check.key_id,
            required_master = %check.required_master,
            required_slave = %check.required_slave,
            "SECURITY: key requested under the wrong master SAE"
        );
        return Err(KmeError::MasterMismatch {
            key_id: check.key_id.to_string(),
        });
    }

    if !record.is_authorized(check.required_slave) {
        warn!(
            key_id = %check.key_id,
            sae_id = %check.required_slave,
            "SECURITY: SAE is not a party to the key"
        );
        return Err(KmeError::NotAuthorized {
            key_id: check.key_id.to_string(),
            sae_id: check.required_slave.to_string(),
        });
    }

    Ok(())
}
