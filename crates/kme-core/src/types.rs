//! Key records and the ETSI GS QKD 014 key containers

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// A stored key: material plus the two SAEs allowed to retrieve it
///
/// Serialized as `{"key": ..., "acl": [slave, master], "master": ...}` for
/// every storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Base64-encoded key material
    key: String,

    /// Authorized parties, `[slave, master]`, fixed at creation
    acl: [String; 2],

    /// SAE that requested the key
    master: String,
}

impl KeyRecord {
    /// Bind key material to a master SAE and its slave counterpart
    pub fn new(
        master: impl Into<String>,
        slave: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        let master = master.into();
        Self {
            key: key.into(),
            acl: [slave.into(), master.clone()],
            master,
        }
    }

    /// Base64-encoded key material
    pub fn key_material(&self) -> &str {
        &self.key
    }

    /// SAE that created the key
    pub fn master(&self) -> &str {
        &self.master
    }

    /// The two SAEs bound to the key
    pub fn authorized_parties(&self) -> &[String; 2] {
        &self.acl
    }

    /// Whether `sae_id` is one of the two bound parties
    pub fn is_authorized(&self, sae_id: &str) -> bool {
        self.acl.iter().any(|party| party == sae_id)
    }

    /// Pair this record with its key ID for delivery to an SAE
    pub fn to_container(&self, key_id: impl Into<String>) -> KeyContainer {
        KeyContainer::new(key_id, self.key.clone())
    }

    /// Serialize to the JSON string kept by the store
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a record read back from the store
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// ETSI key container: one key and its identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyContainer {
    #[serde(rename = "key_ID")]
    pub key_id: String,

    /// Base64-encoded key material
    pub key: String,
}

impl KeyContainer {
    pub fn new(key_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key: key.into(),
        }
    }
}

/// ETSI `Key container` response body: `{"keys": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyContainers {
    pub keys: Vec<KeyContainer>,
}

impl From<Vec<KeyContainer>> for KeyContainers {
    fn from(keys: Vec<KeyContainer>) -> Self {
        Self { keys }
    }
}

/// A reference to a previously issued key, as sent in `dec_keys`
///
/// Any field besides `key_ID` (for example `key_ID_extension`) is collected
/// into `extensions`; the KME does not understand such references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyIdRef {
    #[serde(rename = "key_ID")]
    pub key_id: String,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl KeyIdRef {
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            extensions: Map::new(),
        }
    }

    /// Attach an extension field
    pub fn with_extension(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(name.into(), value);
        self
    }

    pub fn has_extensions(&self) -> bool {
        !self.extensions.is_empty()
    }
}

/// ETSI `Key IDs` request body: `{"key_IDs": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyIdList {
    #[serde(rename = "key_IDs")]
    pub key_ids: Vec<KeyIdRef>,
}
