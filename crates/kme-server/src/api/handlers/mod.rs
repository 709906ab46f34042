//! API request handlers

pub mod keys;
pub mod status;

pub use keys::{get_keys, post_keys, AppState, EncKeysRequest, EtsiMethod};
pub use status::{status_descriptor, StatusResponse};
