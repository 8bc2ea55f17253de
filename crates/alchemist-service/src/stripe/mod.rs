//! Stripe integration for payments.
//!
//! Stripe handles:
//! - Credit purchases via Checkout (one-time payments, not subscriptions)
//! - Webhook delivery of payment lifecycle events
//!
//! Webhook signatures are verified in [`signature`]; the processing state
//! machine lives in the webhook handler.

pub mod client;
pub mod signature;
pub mod types;

pub use client::{StripeClient, StripeError};
pub use signature::verify_signature;
pub use types::*;
