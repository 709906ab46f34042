//! Error types for the key management entity

use thiserror::Error;

/// Result type alias using KmeError
pub type Result<T> = std::result::Result<T, KmeError>;

/// Failures of KME operations
///
/// Every variant is a tagged outcome the HTTP boundary maps to a status
/// code; none of them is meant to escape as an unhandled fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KmeError {
    /// No record is stored under the key ID
    #[error("Key ID not found: {0}")]
    KeyNotFound(String),

    /// The key reference carries an extension field this KME does not understand
    #[error("Unsupported key ID extension in reference to {0}")]
    UnsupportedExtension(String),

    /// The requested master does not match the SAE that created the key
    #[error("Master SAE mismatch for key {key_id}")]
    MasterMismatch { key_id: String },

    /// The requesting slave is not one of the two parties bound to the key
    #[error("SAE '{sae_id}' is not authorized for key {key_id}")]
    NotAuthorized { key_id: String, sae_id: String },

    /// A size or number parameter is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Stored key material is not valid base64
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Record serialization or deserialization failed
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The storage backend failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl KmeError {
    /// Whether this error is an access-control denial
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, KmeError::MasterMismatch { .. } | KmeError::NotAuthorized { .. })
    }

    /// Whether this error means the key cannot be served at all
    pub fn is_not_found(&self) -> bool {
        matches!(self, KmeError::KeyNotFound(_) | KmeError::UnsupportedExtension(_))
    }
}

impl From<serde_json::Error> for KmeError {
    fn from(err: serde_json::Error) -> Self {
        KmeError::SerializationError(err.to_string())
    }
}

impl From<base64::DecodeError> for KmeError {
    fn from(err: base64::DecodeError) -> Self {
        KmeError::InvalidKeyMaterial(err.to_string())
    }
}
