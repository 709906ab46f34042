//! Key identifier and key material generation
//!
//! Key material comes from the operating system CSPRNG; there is no physical
//! QKD link behind it. Key IDs are random (v4) UUIDs.

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::{rngs::OsRng, RngCore};
use uuid::Uuid;

use crate::error::Result;

/// Generate a fresh 128-bit random key identifier
pub fn generate_key_id() -> String {
    Uuid::new_v4().to_string()
}

/// Number of bytes needed to hold `size_bits` bits of key material
pub fn key_length_bytes(size_bits: u32) -> usize {
    (size_bits as usize).div_ceil(8)
}

/// Generate `ceil(size_bits / 8)` random bytes, base64-encoded
pub fn generate_key_material(size_bits: u32) -> String {
    let mut bytes = vec![0u8; key_length_bytes(size_bits)];
    OsRng.fill_bytes(&mut bytes);
    STANDARD.encode(&bytes)
}

/// Decode base64 key material back into raw bytes
pub fn decode_key_material(material: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(material)?)
}
