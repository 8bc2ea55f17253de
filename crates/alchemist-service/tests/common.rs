//! Common test utilities for alchemist integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use alchemist_core::{AccessKey, AccessKeyId, Plan};
use alchemist_service::{
    create_router, AppState, BlogPost, ContentGenerator, GeneratorError, ServiceConfig,
};
use alchemist_store::{mint_unique_key, RocksStore, Store};

/// A deterministic generator for tests.
///
/// Succeeds for every keyword except those starting with `fail:`, which
/// simulate a provider-side failure.
pub struct ScriptedGenerator;

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    fn approach(&self) -> &str {
        "scripted-model"
    }

    async fn generate(&self, keyword: &str) -> Result<BlogPost, GeneratorError> {
        if keyword.starts_with("fail:") {
            return Err(GeneratorError::Api {
                status: 500,
                message: "scripted provider failure".into(),
            });
        }

        Ok(BlogPost {
            title: format!("The Complete Guide to {keyword}"),
            tldr: format!("Everything worth knowing about {keyword}, in brief."),
            body: "insightful content ".repeat(220).trim_end().to_string(),
        })
    }
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// Direct store handle for arranging and asserting state.
    pub store: Arc<RocksStore>,
    /// The admin API key for administrative requests.
    pub admin_key: String,
}

impl TestHarness {
    /// Create a new test harness with a fresh database and a scripted
    /// generator.
    pub fn new() -> Self {
        Self::build(|_| {}, true)
    }

    /// Harness without a configured generator (processing should 502).
    pub fn without_generator() -> Self {
        Self::build(|_| {}, false)
    }

    /// Harness with webhook signature verification enabled.
    pub fn with_webhook_secret(secret: &str) -> Self {
        let secret = secret.to_string();
        Self::build(
            move |config| config.stripe_webhook_secret = Some(secret),
            true,
        )
    }

    fn build(configure: impl FnOnce(&mut ServiceConfig), with_generator: bool) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let admin_key = "test-admin-key".to_string();

        let mut config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            admin_api_key: Some(admin_key.clone()),
            rate_limit_max_requests: 10_000,
            ..ServiceConfig::default()
        };
        configure(&mut config);

        let mut state = AppState::new(store.clone(), config);
        if with_generator {
            state = state.with_generator(Arc::new(ScriptedGenerator));
        }

        let router: Router = create_router(state);
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
            store,
            admin_key,
        }
    }

    /// Create a key directly in the store and return its identifier.
    pub fn seed_key(&self, plan: Plan, credits_total: u32) -> AccessKeyId {
        let id = mint_unique_key(self.store.as_ref()).expect("minting failed");
        let key = AccessKey::new(id.clone(), plan, credits_total, None);
        self.store.create_key(&key).expect("key creation failed");
        id
    }

    /// Spend credits on a key directly (test arrangement).
    pub fn spend(&self, id: &AccessKeyId, amount: u32) {
        self.store.debit(id, amount).expect("debit failed");
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
