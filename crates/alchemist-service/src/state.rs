//! Application state.

use std::sync::Arc;

use alchemist_store::{CreditLedger, RocksStore};

use crate::config::ServiceConfig;
use crate::generator::{ContentGenerator, GeminiClient};
use crate::stripe::StripeClient;

/// Application state shared across handlers.
///
/// The store is constructed once at startup and injected here; nothing in
/// the service reaches for ambient global state.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// The credit ledger over the store.
    pub ledger: CreditLedger<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Stripe client for checkout sessions (optional).
    pub stripe: Option<Arc<StripeClient>>,

    /// Article generator (optional).
    pub generator: Option<Arc<dyn ContentGenerator>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        // Create Stripe client if configured
        let stripe = config.stripe_api_key.as_ref().map(|key| {
            tracing::info!("Stripe integration enabled");
            Arc::new(StripeClient::new(key))
        });

        if stripe.is_none() {
            tracing::warn!("Stripe not configured - checkout will not be available");
        }

        // Create Gemini client if configured
        let generator: Option<Arc<dyn ContentGenerator>> =
            config.gemini_api_key.as_ref().map(|key| {
                tracing::info!(model = %config.gemini_model, "Gemini integration enabled");
                Arc::new(GeminiClient::new(key, &config.gemini_model))
                    as Arc<dyn ContentGenerator>
            });

        if generator.is_none() {
            tracing::warn!("Gemini not configured - keyword processing will not be available");
        }

        Self {
            ledger: CreditLedger::new(store.clone()),
            store,
            config,
            stripe,
            generator,
        }
    }

    /// Replace the article generator (used by tests to inject a scripted
    /// implementation).
    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn ContentGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Check if Stripe is configured.
    #[must_use]
    pub fn has_stripe(&self) -> bool {
        self.stripe.is_some()
    }
}
