//! Core logic for the key management entity

mod acl;
mod validation;

pub use acl::{authorize, AccessCheck};
pub use validation::validate_key_request;
