//! Administrative endpoint integration tests.

mod common;

use alchemist_core::Plan;
use alchemist_store::Store;
use common::TestHarness;
use serde_json::json;

#[tokio::test]
async fn admin_create_key_mints_a_working_key() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/admin/keys")
        .add_header("x-admin-key", harness.admin_key.clone())
        .json(&json!({ "plan": "blogger", "email": "support@example.com" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["plan"], "blogger");
    assert_eq!(body["credits"], 50);

    let access_key = body["access_key"].as_str().unwrap();
    assert!(access_key.starts_with("KWA-"));

    // The minted key validates immediately.
    let response = harness
        .server
        .post("/api/auth/validate")
        .json(&json!({ "access_key": access_key }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["credits_remaining"], 50);
}

#[tokio::test]
async fn admin_create_key_defaults_to_basic() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/admin/keys")
        .add_header("x-admin-key", harness.admin_key.clone())
        .json(&json!({}))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["plan"], "basic");
    assert_eq!(body["credits"], 10);
}

#[tokio::test]
async fn admin_create_key_rejects_unknown_plan() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/admin/keys")
        .add_header("x-admin-key", harness.admin_key.clone())
        .json(&json!({ "plan": "enterprise" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn admin_endpoints_require_the_admin_key() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/admin/keys")
        .json(&json!({ "plan": "basic" }))
        .await;
    response.assert_status_unauthorized();

    let response = harness
        .server
        .post("/api/admin/keys")
        .add_header("x-admin-key", "wrong-key")
        .json(&json!({ "plan": "basic" }))
        .await;
    response.assert_status_unauthorized();

    let response = harness.server.get("/api/admin/keys").await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn admin_list_keys_newest_first() {
    let harness = TestHarness::new();

    let first = harness.seed_key(Plan::Basic, 10);
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = harness.seed_key(Plan::Pro, 240);

    let response = harness
        .server
        .get("/api/admin/keys")
        .add_header("x-admin-key", harness.admin_key.clone())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let keys = body["keys"].as_array().unwrap();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0]["key"], second.to_string());
    assert_eq!(keys[0]["credits_remaining"], 240);
    assert_eq!(keys[1]["key"], first.to_string());
}

#[tokio::test]
async fn admin_delete_all_keys() {
    let harness = TestHarness::new();
    harness.seed_key(Plan::Basic, 10);
    harness.seed_key(Plan::Blogger, 50);

    let response = harness
        .server
        .delete("/api/admin/keys")
        .add_header("x-admin-key", harness.admin_key.clone())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["deleted"], true);

    assert!(harness.store.list_keys().unwrap().is_empty());
}

#[tokio::test]
async fn admin_clear_analytics_preserves_keys() {
    let harness = TestHarness::new();
    let key = harness.seed_key(Plan::Basic, 10);

    // Produce some analytics rows through the public surface.
    harness
        .server
        .post("/api/keywords/process")
        .json(&json!({
            "access_key": key.to_string(),
            "keywords": ["one", "two"]
        }))
        .await
        .assert_status_ok();

    assert_eq!(harness.store.usage_records().unwrap().len(), 1);
    assert_eq!(harness.store.keyword_attempts().unwrap().len(), 2);

    let response = harness
        .server
        .post("/api/admin/clear-analytics")
        .add_header("x-admin-key", harness.admin_key.clone())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["cleared"], true);

    assert!(harness.store.usage_records().unwrap().is_empty());
    assert!(harness.store.keyword_attempts().unwrap().is_empty());

    // Keys and their balances survive the reset.
    let stored = harness.store.get_key(&key).unwrap().unwrap();
    assert_eq!(stored.credits_used, 2);
}
