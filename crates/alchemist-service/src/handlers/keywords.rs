//! Keyword batch processing - the externally facing unit of work.
//!
//! One request ties together validation, authorization, generation, and
//! settlement:
//!
//! 1. authorize against the key's remaining credits (pure read);
//! 2. if the batch doesn't fit, report the allowed/rejected split without
//!    generating or charging anything;
//! 3. otherwise generate per keyword in submitted order - a provider failure
//!    is isolated to its keyword and still consumes the credit;
//! 4. settle exactly the attempted count and append the audit records.
//!
//! Generation holds no lock; only the short authorize/settle calls touch the
//! store.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use alchemist_core::{AccessKeyId, KeywordAttempt, UsageRecord, MAX_KEYWORDS_PER_BATCH};
use alchemist_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// Keyword processing request.
#[derive(Debug, Deserialize)]
pub struct ProcessKeywordsRequest {
    /// The access key to bill against.
    pub access_key: String,
    /// Ordered keyword batch.
    pub keywords: Vec<String>,
}

/// A generated article for one keyword.
#[derive(Debug, Serialize)]
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
#[derive(Debug, Serialize)]
pub struct FailedKeyword {
    /// The keyword as submitted.
    pub keyword: String,
    /// Error attributed to this keyword.
    pub error: String,
}

/// Response for a processed batch.
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    /// `true`: the batch was attempted.
    pub success: bool,
    /// Articles generated, in submission order.
    pub processed: Vec<ProcessedKeyword>,
    /// Keywords whose generation failed.
    pub failed: Vec<FailedKeyword>,
    /// Credits remaining after settlement.
    pub credits_remaining: u32,
}

/// Response when the batch exceeds the remaining credits.
///
/// Nothing is generated or charged; the caller decides whether to resubmit
/// the allowed prefix.
#[derive(Debug, Serialize)]
pub struct PartialResponse {
    /// `false`: nothing was attempted.
    pub success: bool,
    /// Human-readable explanation.
    pub message: String,
    /// Credits remaining (unchanged).
    pub credits_remaining: u32,
    /// The prefix of the batch that fits the balance.
    pub allowed_keywords: Vec<String>,
    /// The keywords that do not fit.
    pub rejected_keywords: Vec<String>,
}

/// Process an ordered keyword batch against an access key.
pub async fn process_keywords(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ProcessKeywordsRequest>,
) -> Result<Response, ApiError> {
    let key_id: AccessKeyId = body.access_key.parse().map_err(|_| ApiError::InvalidKey)?;

    if body.keywords.len() > MAX_KEYWORDS_PER_BATCH {
        return Err(ApiError::BadRequest(format!(
            "at most {MAX_KEYWORDS_PER_BATCH} keywords per batch"
        )));
    }
    #[allow(clippy::cast_possible_truncation)]
    let requested = body.keywords.len() as u32;

    let auth = state.ledger.authorize(&key_id, requested)?;

    // Partial authorization: report the split, charge nothing.
    if requested > auth.remaining() {
        let split = auth.allowed() as usize;
        let allowed_keywords = body.keywords[..split].to_vec();
        let rejected_keywords = body.keywords[split..].to_vec();

        tracing::info!(
            access_key = %key_id,
            requested,
            remaining = auth.remaining(),
            "batch exceeds remaining credits"
        );

        return Ok(Json(PartialResponse {
            success: false,
            message: format!(
                "Insufficient credits. {} credits remaining.",
                auth.remaining()
            ),
            credits_remaining: auth.remaining(),
            allowed_keywords,
            rejected_keywords,
        })
        .into_response());
    }

    let generator = state
        .generator
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("content generator not configured".into()))?;
    let approach = generator.approach().to_string();

    let mut processed = Vec::new();
    let mut failed = Vec::new();
    let mut consumed: u32 = 0;

    for keyword in &body.keywords {
        let started = Instant::now();
        let result = generator.generate(keyword).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        // Attempted, so billed, regardless of the outcome.
        consumed += 1;

        let attempt = match result {
            Ok(post) => {
                let attempt = KeywordAttempt::succeeded(
                    key_id.clone(),
                    keyword.clone(),
                    approach.clone(),
                    post.word_count(),
                    elapsed_ms,
                );
                processed.push(ProcessedKeyword {
                    keyword: keyword.clone(),
                    title: post.title,
                    tldr: post.tldr,
                    body: post.body,
                    approach: approach.clone(),
                });
                attempt
            }
            Err(e) => {
                tracing::warn!(
                    access_key = %key_id,
                    keyword = %keyword,
                    error = %e,
                    "keyword generation failed"
                );
                failed.push(FailedKeyword {
                    keyword: keyword.clone(),
                    error: e.to_string(),
                });
                KeywordAttempt::failed(key_id.clone(), keyword.clone(), approach.clone(), e.to_string())
            }
        };

        // Audit logging must not abort the batch.
        if let Err(e) = state.store.append_keyword_attempt(&attempt) {
            tracing::warn!(error = %e, "failed to append keyword attempt record");
        }
    }

    let credits_remaining = match state.ledger.settle(&auth, consumed) {
        Ok(remaining) => {
            if consumed > 0 {
                let record = UsageRecord::new(key_id.clone(), requested, consumed, consumed);
                if let Err(e) = state.store.append_usage(&record) {
                    tracing::warn!(error = %e, "failed to append usage record");
                }
            }
            remaining
        }
        Err(e) => {
            // Work is done but unbilled. The results still go back to the
            // caller; the shortfall is flagged for reconciliation.
            tracing::error!(
                access_key = %key_id,
                consumed,
                error = %e,
                "credit settlement failed after generation; unbilled credits pending reconciliation"
            );
            auth.remaining()
        }
    };

    tracing::info!(
        access_key = %key_id,
        requested,
        succeeded = processed.len(),
        failed = failed.len(),
        credits_remaining,
        "keyword batch processed"
    );

    Ok(Json(BatchResponse {
        success: true,
        processed,
        failed,
        credits_remaining,
    })
    .into_response())
}
