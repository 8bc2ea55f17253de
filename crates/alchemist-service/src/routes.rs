//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{admin, checkout, health, keywords, validate, webhooks};
use crate::rate_limit::{self, RateLimiter};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /api/health` - Health check
/// - `GET /api/plans` - Plan listing
///
/// ## Access-key auth (key in request body)
/// - `POST /api/auth/validate` - Validate a key and fetch its balance
/// - `POST /api/keywords/process` - Process a keyword batch
///
/// ## Payments
/// - `POST /api/checkout` - Create a Stripe Checkout session
/// - `POST /api/webhooks/stripe` - Stripe webhooks (signature verification)
///
/// ## Admin (`x-admin-key` header)
/// - `POST /api/admin/keys` - Mint a key, bypassing payment
/// - `GET /api/admin/keys` - List all keys
/// - `DELETE /api/admin/keys` - Delete all keys
/// - `POST /api/admin/clear-analytics` - Truncate analytics logs
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let limiter = Arc::new(RateLimiter::new(
        state.config.rate_limit_max_requests,
        Duration::from_secs(state.config.rate_limit_window_seconds),
    ));

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Public
        .route("/api/health", get(health::health))
        .route("/api/plans", get(checkout::list_plans))
        // Key validation and processing
        .route("/api/auth/validate", post(validate::validate_key))
        .route("/api/keywords/process", post(keywords::process_keywords))
        // Payments
        .route("/api/checkout", post(checkout::create_checkout))
        .route("/api/webhooks/stripe", post(webhooks::stripe_webhook))
        // Admin
        .route(
            "/api/admin/keys",
            post(admin::create_key)
                .get(admin::list_keys)
                .delete(admin::delete_all_keys),
        )
        .route("/api/admin/clear-analytics", post(admin::clear_analytics))
        // Middleware
        .layer(middleware::from_fn_with_state(limiter, rate_limit::enforce))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
