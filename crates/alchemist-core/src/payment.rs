//! Payment records for webhook idempotency.
//!
//! One record per payment-provider checkout session. The `session_id` is the
//! idempotency key: re-delivery of the same checkout event must find the
//! existing record and must not mint a second access key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access_key::{AccessKeyId, Plan};

/// Outcome of applying a payment event.
///
/// A completed payment always references the key it funded; a failed one
/// always carries the error. Modeling this as a tagged variant keeps the
/// "key exists but no completed record" half-state unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "payment_status", rename_all = "snake_case")]
pub enum PaymentOutcome {
    /// The payment funded a new access key.
    Completed {
        /// The key minted for this payment.
        access_key: AccessKeyId,
    },

    /// Applying the payment failed after the event was accepted.
    Failed {
        /// Why key creation did not happen.
        error: String,
    },

    /// The provider has not finished settling the payment.
    Pending,
}

/// A payment-provider checkout session, recorded at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Provider session identifier. Unique; the idempotency key.
    pub session_id: String,

    /// Plan named in the session metadata.
    pub plan: Plan,

    /// Credits the payment buys.
    pub credits: u32,

    /// Amount the customer paid, in cents.
    pub amount_paid_cents: i64,

    /// Customer email from the checkout session, if present.
    pub customer_email: Option<String>,

    /// What happened when the event was applied.
    pub outcome: PaymentOutcome,

    /// When the record was written.
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Record a payment that successfully funded a key.
    #[must_use]
    pub fn completed(
        session_id: String,
        plan: Plan,
        credits: u32,
        amount_paid_cents: i64,
        customer_email: Option<String>,
        access_key: AccessKeyId,
    ) -> Self {
        Self {
            session_id,
            plan,
            credits,
            amount_paid_cents,
            customer_email,
            outcome: PaymentOutcome::Completed { access_key },
            created_at: Utc::now(),
        }
    }

    /// Record a payment whose application failed.
    #[must_use]
    pub fn failed(
        session_id: String,
        plan: Plan,
        credits: u32,
        amount_paid_cents: i64,
        customer_email: Option<String>,
        error: String,
    ) -> Self {
        Self {
            session_id,
            plan,
            credits,
            amount_paid_cents,
            customer_email,
            outcome: PaymentOutcome::Failed { error },
            created_at: Utc::now(),
        }
    }

    /// The funded key, when the payment completed.
    #[must_use]
    pub fn access_key(&self) -> Option<&AccessKeyId> {
        match &self.outcome {
            PaymentOutcome::Completed { access_key } => Some(access_key),
            PaymentOutcome::Failed { .. } | PaymentOutcome::Pending => None,
        }
    }

    /// Whether this payment completed and funded a key.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, PaymentOutcome::Completed { .. })
    }
}
