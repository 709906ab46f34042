//! # KME Core
//!
//! Core types and key generation for an ETSI GS QKD 014 Key Management
//! Entity (KME).
//!
//! ## Key Concepts
//!
//! - **Key Record**: the stored unit, binding key material to the master SAE
//!   that requested it and the two parties allowed to retrieve it
//! - **Key Container**: the ETSI `{"key_ID", "key"}` pair handed to SAEs
//! - **Key ID reference**: an entry of a `dec_keys` request naming a key
//!
//! ## Record Invariants
//!
//! 1. **Immutability**: a record never changes after creation
//! 2. **Two parties**: the ACL holds exactly `[slave, master]`
//! 3. **Uniqueness**: key IDs are 128-bit random UUIDs; no collision check is made on insert

pub mod crypto;
pub mod error;
pub mod types;

pub use crypto::{decode_key_material, generate_key_id, generate_key_material, key_length_bytes};
pub use error::{KmeError, Result};
pub use types::{KeyContainer, KeyContainers, KeyIdList, KeyIdRef, KeyRecord};

/// Default key size in bits when a request does not name one
pub const DEFAULT_KEY_SIZE_BITS: u32 = 256;

/// Default number of keys per `enc_keys` request
pub const DEFAULT_KEY_NUMBER: u32 = 1;

/// Smallest key size advertised in the status descriptor
pub const MIN_KEY_SIZE_BITS: u32 = 64;

/// Largest key size advertised in the status descriptor
pub const MAX_KEY_SIZE_BITS: u32 = 1024;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
