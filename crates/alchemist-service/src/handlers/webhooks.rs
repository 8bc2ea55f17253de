//! Stripe webhook handler.
//!
//! Converts a `checkout.session.completed` event into exactly one funded
//! access key, resilient to at-least-once delivery:
//!
//! 1. verify the signature (when a signing secret is configured);
//! 2. extract `plan` and `credits` from the session metadata;
//! 3. idempotency check by session id - a replay returns the recorded
//!    outcome without minting anything;
//! 4. mint a key and write the key + completed payment record in one atomic
//!    store operation; the storage-level session-id uniqueness closes the
//!    race between two concurrent deliveries.
//!
//! Standalone payment-intent events are logged for observability only.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use alchemist_core::{AccessKey, PaymentRecord, Plan};
use alchemist_store::{mint_unique_key, Store, StoreError};

use crate::error::ApiError;
use crate::state::AppState;
use crate::stripe::verify_signature;

/// Stripe webhook payload (simplified).
#[derive(Debug, Deserialize)]
pub struct StripeWebhook {
    /// Event type.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event ID.
    pub id: String,
    /// Event data.
    pub data: StripeEventData,
}

/// Stripe event data container.
#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    /// Event object.
    pub object: serde_json::Value,
}

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Whether the webhook was processed.
    pub received: bool,
}

/// Handle Stripe webhooks.
pub async fn stripe_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookResponse>, ApiError> {
    // Verify signature if a signing secret is configured
    if let Some(secret) = &state.config.stripe_webhook_secret {
        let signature = headers
            .get("stripe-signature")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::BadRequest("Missing Stripe signature".into()))?;

        verify_signature(secret, &body, signature).map_err(|e| {
            tracing::warn!(error = %e, "Invalid Stripe webhook signature");
            ApiError::BadRequest("Invalid webhook signature".into())
        })?;
    } else {
        // No signing secret configured - skip verification (development mode)
        tracing::warn!("Stripe webhook secret not configured - skipping signature verification");
    }

    // Parse webhook payload
    let webhook: StripeWebhook =
        serde_json::from_str(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::info!(
        event_type = %webhook.event_type,
        event_id = %webhook.id,
        "Received Stripe webhook"
    );

    match webhook.event_type.as_str() {
        "checkout.session.completed" => {
            handle_checkout_completed(&state, &webhook.data.object)?;
        }
        "payment_intent.succeeded" => {
            let payment_intent_id = pick_str(&webhook.data.object, "id").unwrap_or("unknown");
            tracing::info!(payment_intent_id = %payment_intent_id, "Payment succeeded");
        }
        "payment_intent.payment_failed" => {
            let payment_intent_id = pick_str(&webhook.data.object, "id").unwrap_or("unknown");
            tracing::warn!(payment_intent_id = %payment_intent_id, "Payment failed");
        }
        _ => {
            tracing::debug!(event_type = %webhook.event_type, "Unhandled Stripe event");
        }
    }

    Ok(Json(WebhookResponse { received: true }))
}

/// Apply a completed checkout session: one funded key, exactly once.
fn handle_checkout_completed(
    state: &AppState,
    session: &serde_json::Value,
) -> Result<(), ApiError> {
    let session_id = pick_str(session, "id")
        .ok_or_else(|| ApiError::BadRequest("Missing session id".into()))?;

    let metadata = session.get("metadata");
    let plan_name = metadata
        .and_then(|m| m.get("plan"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiError::BadRequest("Missing plan or credits in session metadata".into()))?;
    let credits = metadata
        .and_then(|m| m.get("credits"))
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| ApiError::BadRequest("Missing plan or credits in session metadata".into()))?;

    let plan: Plan = plan_name
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid plan in metadata: {plan_name}")))?;

    let amount_paid_cents = session
        .get("amount_total")
        .and_then(serde_json::Value::as_i64)
        .unwrap_or(0);
    let customer_email = pick_str(session, "customer_email").map(String::from);

    // Idempotency: re-delivery of a recorded session changes nothing.
    if let Some(existing) = state.store.get_payment(session_id)? {
        tracing::info!(
            session_id = %session_id,
            access_key = ?existing.access_key(),
            "Duplicate checkout delivery, returning recorded outcome"
        );
        return Ok(());
    }

    match apply_checkout(
        state,
        session_id,
        plan,
        credits,
        amount_paid_cents,
        customer_email.clone(),
    ) {
        Ok(key_id) => {
            tracing::info!(
                session_id = %session_id,
                access_key = %key_id,
                plan = %plan,
                credits,
                customer_email = ?customer_email,
                "Access key created from checkout"
            );
            Ok(())
        }
        // Lost the race against a concurrent delivery of the same session;
        // the winner already minted the key.
        Err(ApiError::Conflict(_)) => {
            tracing::info!(session_id = %session_id, "Concurrent checkout delivery already applied");
            Ok(())
        }
        Err(e) => {
            // Record the failure so the retry is observable, then propagate
            // so the provider redelivers.
            let failure = PaymentRecord::failed(
                session_id.to_string(),
                plan,
                credits,
                amount_paid_cents,
                customer_email,
                e.to_string(),
            );
            if let Err(log_err) = state.store.record_payment(&failure) {
                tracing::error!(
                    session_id = %session_id,
                    error = %log_err,
                    "Failed to record failed payment"
                );
            }
            Err(e)
        }
    }
}

/// Mint a key and persist it with its payment record atomically.
fn apply_checkout(
    state: &AppState,
    session_id: &str,
    plan: Plan,
    credits: u32,
    amount_paid_cents: i64,
    customer_email: Option<String>,
) -> Result<alchemist_core::AccessKeyId, ApiError> {
    let key_id = mint_unique_key(state.store.as_ref()).map_err(|e| {
        tracing::error!(session_id = %session_id, error = %e, "Key minting failed");
        ApiError::from(e)
    })?;

    let key = AccessKey::new(key_id.clone(), plan, credits, customer_email.clone());
    let payment = PaymentRecord::completed(
        session_id.to_string(),
        plan,
        credits,
        amount_paid_cents,
        customer_email,
        key_id.clone(),
    );

    match state.store.record_checkout(&key, &payment) {
        Ok(()) => Ok(key_id),
        Err(e @ StoreError::DuplicatePayment { .. }) => Err(ApiError::Conflict(e.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Extract a string field from a Stripe object.
fn pick_str<'a>(value: &'a serde_json::Value, field: &str) -> Option<&'a str> {
    value.get(field).and_then(|v| v.as_str())
}
