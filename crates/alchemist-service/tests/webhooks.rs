//! Stripe webhook integration tests.

mod common;

use alchemist_store::Store;
use common::TestHarness;
use serde_json::json;

fn checkout_completed_payload(session_id: &str, plan: &str, credits: &str) -> serde_json::Value {
    json!({
        "id": format!("evt_{session_id}"),
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": session_id,
                "payment_status": "paid",
                "amount_total": 10_000,
                "customer_email": "a@b.com",
                "metadata": {
                    "plan": plan,
                    "credits": credits,
                    "service": "keyword-alchemist"
                }
            }
        }
    })
}

#[tokio::test]
async fn checkout_completed_mints_exactly_one_key() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/webhooks/stripe")
        .text(
            serde_json::to_string(&checkout_completed_payload("cs_test_1", "pro", "240")).unwrap(),
        )
        .content_type("application/json")
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["received"], true);

    // Exactly one key, funded per the metadata.
    let keys = harness.store.list_keys().unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].credits_total, 240);
    assert_eq!(keys[0].credits_used, 0);
    assert_eq!(keys[0].plan.as_str(), "pro");
    assert_eq!(keys[0].email.as_deref(), Some("a@b.com"));

    // Exactly one completed payment record referencing the key.
    let payment = harness.store.get_payment("cs_test_1").unwrap().unwrap();
    assert!(payment.is_completed());
    assert_eq!(payment.access_key(), Some(&keys[0].id));
    assert_eq!(payment.amount_paid_cents, 10_000);
    assert_eq!(payment.customer_email.as_deref(), Some("a@b.com"));
}

#[tokio::test]
async fn duplicate_delivery_does_not_double_grant() {
    let harness = TestHarness::new();
    let payload =
        serde_json::to_string(&checkout_completed_payload("cs_test_2", "blogger", "50")).unwrap();

    let first = harness
        .server
        .post("/api/webhooks/stripe")
        .text(payload.clone())
        .content_type("application/json")
        .await;
    first.assert_status_ok();

    let minted_after_first = harness.store.list_keys().unwrap();
    assert_eq!(minted_after_first.len(), 1);

    // Stripe redelivers the same event.
    let second = harness
        .server
        .post("/api/webhooks/stripe")
        .text(payload)
        .content_type("application/json")
        .await;
    second.assert_status_ok();

    let minted_after_second = harness.store.list_keys().unwrap();
    assert_eq!(minted_after_second.len(), 1);
    assert_eq!(minted_after_second[0].id, minted_after_first[0].id);
}

#[tokio::test]
async fn missing_metadata_is_a_malformed_event() {
    let harness = TestHarness::new();

    let payload = json!({
        "id": "evt_missing_meta",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_3",
                "amount_total": 599,
                "customer_email": "a@b.com",
                "metadata": {}
            }
        }
    });

    let response = harness
        .server
        .post("/api/webhooks/stripe")
        .text(serde_json::to_string(&payload).unwrap())
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
    assert!(harness.store.list_keys().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_plan_in_metadata_is_rejected() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/webhooks/stripe")
        .text(
            serde_json::to_string(&checkout_completed_payload("cs_test_4", "enterprise", "999"))
                .unwrap(),
        )
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
    assert!(harness.store.list_keys().unwrap().is_empty());
}

#[tokio::test]
async fn payment_intent_events_are_logged_only() {
    let harness = TestHarness::new();

    for event_type in ["payment_intent.succeeded", "payment_intent.payment_failed"] {
        let payload = json!({
            "id": "evt_intent",
            "type": event_type,
            "data": { "object": { "id": "pi_test_1", "amount": 599 } }
        });

        let response = harness
            .server
            .post("/api/webhooks/stripe")
            .text(serde_json::to_string(&payload).unwrap())
            .content_type("application/json")
            .await;

        response.assert_status_ok();
    }

    assert!(harness.store.list_keys().unwrap().is_empty());
}

#[tokio::test]
async fn unhandled_event_types_are_acknowledged() {
    let harness = TestHarness::new();

    let payload = json!({
        "id": "evt_other",
        "type": "customer.created",
        "data": { "object": { "id": "cus_123" } }
    });

    let response = harness
        .server
        .post("/api/webhooks/stripe")
        .text(serde_json::to_string(&payload).unwrap())
        .content_type("application/json")
        .await;

    response.assert_status_ok();
}

// ============================================================================
// Signature verification
// ============================================================================

/// Helper to compute a test signature (same algorithm as the service).
fn compute_test_signature(secret: &str, message: &str) -> String {
    use sha2::{Digest, Sha256};

    let key = secret.as_bytes();
    let message = message.as_bytes();
    const BLOCK_SIZE: usize = 64;

    let key = if key.len() > BLOCK_SIZE {
        let mut hasher = Sha256::new();
        hasher.update(key);
        hasher.finalize().to_vec()
    } else {
        key.to_vec()
    };

    let mut key_padded = [0u8; BLOCK_SIZE];
    key_padded[..key.len()].copy_from_slice(&key);

    let mut i_key_pad = [0x36u8; BLOCK_SIZE];
    let mut o_key_pad = [0x5cu8; BLOCK_SIZE];

    for i in 0..BLOCK_SIZE {
        i_key_pad[i] ^= key_padded[i];
        o_key_pad[i] ^= key_padded[i];
    }

    let mut inner_hasher = Sha256::new();
    inner_hasher.update(i_key_pad);
    inner_hasher.update(message);
    let inner_hash = inner_hasher.finalize();

    let mut outer_hasher = Sha256::new();
    outer_hasher.update(o_key_pad);
    outer_hasher.update(inner_hash);
    let hmac = outer_hasher.finalize();

    hex::encode(hmac)
}

#[tokio::test]
async fn missing_signature_is_rejected_when_secret_configured() {
    let harness = TestHarness::with_webhook_secret("whsec_test");

    let response = harness
        .server
        .post("/api/webhooks/stripe")
        .text(
            serde_json::to_string(&checkout_completed_payload("cs_test_5", "basic", "10")).unwrap(),
        )
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
    assert!(harness.store.list_keys().unwrap().is_empty());
}

#[tokio::test]
async fn bad_signature_is_rejected() {
    let harness = TestHarness::with_webhook_secret("whsec_test");

    let response = harness
        .server
        .post("/api/webhooks/stripe")
        .add_header("stripe-signature", "t=1700000000,v1=deadbeef")
        .text(
            serde_json::to_string(&checkout_completed_payload("cs_test_6", "basic", "10")).unwrap(),
        )
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
    assert!(harness.store.list_keys().unwrap().is_empty());
}

#[tokio::test]
async fn valid_signature_is_accepted() {
    let harness = TestHarness::with_webhook_secret("whsec_test");

    let payload =
        serde_json::to_string(&checkout_completed_payload("cs_test_7", "basic", "10")).unwrap();
    let timestamp = "1700000000";
    let signature = compute_test_signature("whsec_test", &format!("{timestamp}.{payload}"));

    let response = harness
        .server
        .post("/api/webhooks/stripe")
        .add_header(
            "stripe-signature",
            format!("t={timestamp},v1={signature}"),
        )
        .text(payload)
        .content_type("application/json")
        .await;

    response.assert_status_ok();
    assert_eq!(harness.store.list_keys().unwrap().len(), 1);
}
