//! Property-Based Tests for key records and key generation
//!
//! These tests verify, for arbitrary inputs:
//! 1. Key material decodes to exactly ceil(size / 8) bytes
//! 2. Records keep their two parties through storage serialization
//! 3. Only the two bound parties pass the membership check
//!
//! Uses proptest for property-based testing with arbitrary inputs.

use kme_core::{decode_key_material, generate_key_material, key_length_bytes, KeyRecord};
use proptest::prelude::*;

proptest! {
    /// Material length follows the requested bit size, rounded up to bytes
    #[test]
    fn prop_material_length_matches_size(size in 1u32..=4096) {
        let material = generate_key_material(size);
        let bytes = decode_key_material(&material).unwrap();

        prop_assert_eq!(bytes.len(), key_length_bytes(size));
        prop_assert_eq!(bytes.len(), (size as usize + 7) / 8);
    }

    /// A record read back from its stored form is unchanged
    #[test]
    fn prop_record_survives_serialization(
        master in "[a-zA-Z0-9_-]{1,32}",
        slave in "[a-zA-Z0-9_-]{1,32}",
        size in 1u32..=1024,
    ) {
        let record = KeyRecord::new(&master, &slave, generate_key_material(size));
        let restored = KeyRecord::from_json(&record.to_json().unwrap()).unwrap();

        prop_assert_eq!(restored.master(), master.as_str());
        prop_assert_eq!(restored.authorized_parties(), &[slave.clone(), master.clone()]);
        prop_assert_eq!(restored, record);
    }

    /// Membership holds for exactly the two parties
    #[test]
    fn prop_only_bound_parties_authorized(
        master in "[a-z]{3,10}",
        slave in "[a-z]{3,10}",
        outsider in "[a-z]{3,10}",
    ) {
        prop_assume!(outsider != master && outsider != slave);

        let record = KeyRecord::new(&master, &slave, "AAAA");

        prop_assert!(record.is_authorized(&master));
        prop_assert!(record.is_authorized(&slave));
        prop_assert!(!record.is_authorized(&outsider));
    }
}
