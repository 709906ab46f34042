//! Parameter validation for key requests

use kme_core::KmeError;

/// Validate the resolved `size` and `number` of an `enc_keys` request
///
/// Only positivity is enforced. The 64..=1024 bit range and the
/// per-request key limit in the status descriptor are advertised, not
/// enforced.
pub fn validate_key_request(size: u32, number: u32) -> Result<(), KmeError> {
    if size == 0 {
        return Err(KmeError::InvalidParameter("size must be a positive integer".into()));
    }

    if number == 0 {
        return Err(KmeError::InvalidParameter("number must be a positive integer".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_values_accepted() {
        assert!(validate_key_request(256, 1).is_ok());
        assert!(validate_key_request(1, 1).is_ok());
        assert!(validate_key_request(4096, 500).is_ok());
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(validate_key_request(0, 1), Err(KmeError::InvalidParameter(_))));
    }

    #[test]
    fn test_zero_number_rejected() {
        assert!(matches!(validate_key_request(256, 0), Err(KmeError::InvalidParameter(_))));
    }
}
