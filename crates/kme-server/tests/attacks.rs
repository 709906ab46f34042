//! Attack Scenario Tests
//!
//! Each test is a way a third SAE, or one of the two parties misusing its
//! role, could try to obtain key material it is not entitled to.

use kme_core::{KeyIdRef, KmeError};
use kme_server::{KeyManagementEntity, MemoryStore};
use std::sync::Arc;

fn kme() -> KeyManagementEntity {
    KeyManagementEntity::new(Arc::new(MemoryStore::new()))
}

fn refs(ids: &[String]) -> Vec<KeyIdRef> {
    ids.iter().map(|id| KeyIdRef::new(id.as_str())).collect()
}

async fn issue(kme: &KeyManagementEntity, master: &str, slave: &str, number: u32) -> Vec<String> {
    kme.create(master, slave, None, Some(number))
        .await
        .expect("create")
        .into_iter()
        .map(|c| c.key_id)
        .collect()
}

// =============================================================================
// ATTACK: Eavesdropping SAE
// =============================================================================

/// A third SAE learns a key ID (for example from traffic metadata) and asks
/// for the key while correctly naming the master.
#[tokio::test]
async fn attack_outsider_naming_true_master_blocked() {
    let kme = kme();
    let ids = issue(&kme, "sae-A", "sae-B", 1).await;

    let err = kme.retrieve("sae-A", "sae-Eve", &refs(&ids)).await.unwrap_err();
    assert!(matches!(err, KmeError::NotAuthorized { ref sae_id, .. } if sae_id == "sae-Eve"));
}

/// The outsider names itself as master.
#[tokio::test]
async fn attack_outsider_claiming_master_blocked() {
    let kme = kme();
    let ids = issue(&kme, "sae-A", "sae-B", 1).await;

    let err = kme.retrieve("sae-Eve", "sae-B", &refs(&ids)).await.unwrap_err();
    assert!(matches!(err, KmeError::MasterMismatch { .. }));
}

// =============================================================================
// ATTACK: Role confusion
// =============================================================================

/// The slave tries to present itself as the master of a key it did not
/// create.
#[tokio::test]
async fn attack_slave_claiming_master_role_blocked() {
    let kme = kme();
    let ids = issue(&kme, "sae-A", "sae-B", 2).await;

    let err = kme.retrieve("sae-B", "sae-A", &refs(&ids)).await.unwrap_err();
    assert!(err.is_auth_failure());
}

/// The master may fetch its own key back by naming itself on both sides:
/// the slave check is set membership and the master is a member.
#[tokio::test]
async fn master_reading_own_key_allowed() {
    let kme = kme();
    let ids = issue(&kme, "sae-A", "sae-B", 1).await;

    let keys = kme.retrieve("sae-A", "sae-A", &refs(&ids)).await.unwrap();
    assert_eq!(keys.len(), 1);
}

// =============================================================================
// ATTACK: Batch smuggling
// =============================================================================

/// An authorized key is bundled with a key belonging to another pair in the
/// hope that the batch returns partially.
#[tokio::test]
async fn attack_foreign_key_in_batch_returns_nothing() {
    let kme = kme();
    let mine = issue(&kme, "sae-A", "sae-B", 1).await;
    let theirs = issue(&kme, "sae-C", "sae-D", 1).await;

    let batch = refs(&[mine[0].clone(), theirs[0].clone()]);
    let result = kme.retrieve("sae-A", "sae-B", &batch).await;

    assert!(result.is_err(), "partial success must not be returned");
}

/// An extension field on any entry aborts the whole batch.
#[tokio::test]
async fn attack_extension_smuggling_aborts_batch() {
    let kme = kme();
    let ids = issue(&kme, "sae-A", "sae-B", 2).await;

    let batch = vec![
        KeyIdRef::new(ids[0].as_str()),
        KeyIdRef::new(ids[1].as_str())
            .with_extension("key_ID_extension", serde_json::json!({"master": "sae-Eve"})),
    ];
    let err = kme.retrieve("sae-A", "sae-B", &batch).await.unwrap_err();
    assert!(err.is_not_found());
}

/// Guessing key IDs yields NOT_FOUND, not a hint about existence under
/// another master.
#[tokio::test]
async fn attack_key_id_guessing_not_found() {
    let kme = kme();
    issue(&kme, "sae-A", "sae-B", 5).await;

    let guess = KeyIdRef::new(uuid::Uuid::new_v4().to_string());
    let err = kme.retrieve("sae-A", "sae-B", &[guess]).await.unwrap_err();
    assert!(matches!(err, KmeError::KeyNotFound(_)));
}
