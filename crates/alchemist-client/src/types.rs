//! Wire types for the keyword-alchemist API.

use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    /// Service status (`"ok"`).
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
}

/// Request body for key validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateKeyRequest {
    /// The access key to validate.
    pub access_key: String,
}

/// Successful key validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateKeyResponse {
    /// Always `true` on a 200 response.
    pub valid: bool,
    /// The key's plan name.
    pub plan: String,
    /// Total credits granted.
    pub credits_total: u32,
    /// Credits consumed so far.
    pub credits_used: u32,
    /// Credits still available.
    pub credits_remaining: u32,
    /// Key lifecycle status.
    pub status: String,
}

/// Request body for keyword processing.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessKeywordsRequest {
    /// The access key to bill against.
    pub access_key: String,
    /// Ordered keyword batch.
    pub keywords: Vec<String>,
}

/// A generated article for one keyword.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessedKeyword {
    /// The keyword as submitted.
    pub keyword: String,
    /// Article title.
    pub title: String,
    /// Two-to-three sentence summary.
    pub tldr: String,
    /// Markdown article body.
    pub body: String,
    /// Generation approach (provider model name).
    pub approach: String,
}

/// A keyword whose generation failed. The credit is still consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct FailedKeyword {
    /// The keyword as submitted.
    pub keyword: String,
    /// Error attributed to this keyword.
    pub error: String,
}

/// Outcome of a keyword-processing request.
///
/// The server answers with one of two shapes: a completed batch, or a
/// partial-authorization split when the batch exceeds the remaining credits.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProcessOutcome {
    /// The batch was processed (possibly with per-keyword failures).
    Completed {
        /// Articles generated, in submission order.
        processed: Vec<ProcessedKeyword>,
        /// Keywords whose generation failed.
        failed: Vec<FailedKeyword>,
        /// Credits remaining after settlement.
        credits_remaining: u32,
    },

    /// The batch was larger than the remaining credits; nothing was
    /// processed or charged.
    InsufficientCredits {
        /// Human-readable explanation.
        message: String,
        /// Credits remaining (unchanged).
        credits_remaining: u32,
        /// The prefix of the batch that would fit.
        allowed_keywords: Vec<String>,
        /// The keywords that do not fit.
        rejected_keywords: Vec<String>,
    },
}

/// One purchasable plan.
#[derive(Debug, Clone, Deserialize)]
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
#[derive(Debug, Clone, Deserialize)]
pub struct PlansResponse {
    /// Available plans, cheapest first.
    pub plans: Vec<PlanInfo>,
}

/// API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// The error payload.
    pub error: ApiErrorBody,
}

/// API error payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional structured details.
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
