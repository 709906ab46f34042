//! Key Management Entity: key issuance and authorized retrieval

mod entity;

pub use entity::KeyManagementEntity;
