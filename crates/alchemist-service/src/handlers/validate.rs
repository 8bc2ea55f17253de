//! Access key validation handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use alchemist_core::AccessKeyId;
use alchemist_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// Key validation request.
#[derive(Debug, Deserialize)]
pub struct ValidateKeyRequest {
    /// The access key to validate.
    pub access_key: String,
}

/// Key validation response.
#[derive(Debug, Serialize)]
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

/// Validate an access key and return its balance.
///
/// Absent, suspended, and expired keys all answer the same way; the
/// distinction is deliberately not exposed to callers.
pub async fn validate_key(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ValidateKeyRequest>,
) -> Result<Json<ValidateKeyResponse>, ApiError> {
    let key_id: AccessKeyId = body.access_key.parse().map_err(|_| ApiError::InvalidKey)?;

    let key = state
        .store
        .get_key(&key_id)?
        .ok_or(ApiError::InvalidKey)?;

    Ok(Json(ValidateKeyResponse {
        valid: true,
        plan: key.plan.to_string(),
        credits_total: key.credits_total,
        credits_used: key.credits_used,
        credits_remaining: key.credits_remaining(),
        status: format!("{:?}", key.status).to_lowercase(),
    }))
}
