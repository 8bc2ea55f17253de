//! Plan listing and Stripe checkout handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use alchemist_core::Plan;

use crate::error::ApiError;
use crate::state::AppState;

/// One purchasable plan.
#[derive(Debug, Serialize)]
pub struct PlanInfo {
    /// Plan identifier (`basic`, `blogger`, `pro`).
    pub plan: String,
    /// Display name.
    pub name: String,
    /// Marketing description.
    pub description: String,
    /// Credits granted.
    pub credits: u32,
    /// One-time price in cents.
    pub price_cents: i64,
}

/// Plan listing response.
#[derive(Debug, Serialize)]
pub struct PlansResponse {
    /// Available plans, cheapest first.
    pub plans: Vec<PlanInfo>,
}

/// List the purchasable plans (pricing page data).
pub async fn list_plans() -> Json<PlansResponse> {
    let plans = Plan::all()
        .into_iter()
        .map(|plan| PlanInfo {
            plan: plan.as_str().to_string(),
            name: plan.display_name().to_string(),
            description: plan.description().to_string(),
            credits: plan.credits(),
            price_cents: plan.price_cents(),
        })
        .collect();

    Json(PlansResponse { plans })
}

/// Checkout request.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Plan to purchase.
    pub plan: String,
    /// Email to prefill on the checkout page.
    pub customer_email: Option<String>,
}

/// Checkout response.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Hosted checkout URL to redirect the customer to.
    pub checkout_url: String,
    /// Session ID for tracking.
    pub session_id: String,
}

/// Create a Stripe Checkout session for a plan purchase.
///
/// The session carries `{plan, credits}` metadata; the webhook mints the
/// access key when Stripe reports the session completed.
pub async fn create_checkout(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let plan: Plan = body
        .plan
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid plan: {}", body.plan)))?;

    let stripe = state
        .stripe
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Stripe not configured".into()))?;

    let success_url = format!(
        "{}/payment/success?session_id={{CHECKOUT_SESSION_ID}}",
        state.config.frontend_url
    );
    let cancel_url = format!("{}/payment/cancel", state.config.frontend_url);

    let session = stripe
        .create_checkout_session(
            plan,
            body.customer_email.as_deref(),
            &success_url,
            &cancel_url,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create Stripe checkout session");
            ApiError::ExternalService(format!("Failed to create checkout session: {e}"))
        })?;

    let checkout_url = session
        .url
        .ok_or_else(|| ApiError::ExternalService("Stripe returned no checkout URL".into()))?;

    tracing::info!(
        plan = %plan,
        session_id = %session.id,
        "Stripe checkout session created"
    );

    Ok(Json(CheckoutResponse {
        checkout_url,
        session_id: session.id,
    }))
}
