//! Stripe API wire types.
//!
//! Only the fields this service reads are modeled; Stripe objects carry far
//! more.

use serde::Deserialize;

/// A Stripe Checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Session identifier (`cs_...`). The webhook idempotency key.
    pub id: String,

    /// Hosted checkout URL to redirect the customer to.
    pub url: Option<String>,

    /// Session status (`open`, `complete`, `expired`).
    pub status: Option<String>,

    /// Payment status (`paid`, `unpaid`, `no_payment_required`).
    pub payment_status: Option<String>,
}

/// Stripe error response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    /// The error payload.
    pub error: StripeErrorBody,
}

/// Stripe error payload.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    /// Error category (`invalid_request_error`, ...).
    #[serde(rename = "type")]
    pub error_type: String,

    /// Human-readable message.
    #[serde(default)]
    pub message: String,

    /// Machine-readable code, when present.
    #[serde(default)]
    pub code: Option<String>,
}
