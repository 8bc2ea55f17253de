//! Administrative handlers: key minting, listing, and bulk resets.
//!
//! Everything here requires the `x-admin-key` header.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use alchemist_core::{AccessKey, Plan};
use alchemist_store::{mint_unique_key, Store};

use crate::auth::AdminAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Create key request.
#[derive(Debug, Deserialize)]
pub struct CreateKeyRequest {
    /// Plan to grant (default: `basic`).
    pub plan: Option<String>,
    /// Contact email to attach to the key.
    pub email: Option<String>,
}

/// Create key response.
#[derive(Debug, Serialize)]
pub struct CreateKeyResponse {
    /// `true` on success.
    pub success: bool,
    /// The minted access key.
    pub access_key: String,
    /// Plan granted.
    pub plan: String,
    /// Credits granted.
    pub credits: u32,
}

/// Mint an access key directly, bypassing payment (testing/support path).
pub async fn create_key(
    State(state): State<Arc<AppState>>,
    _auth: AdminAuth,
    Json(body): Json<CreateKeyRequest>,
) -> Result<Json<CreateKeyResponse>, ApiError> {
    let plan: Plan = body
        .plan
        .as_deref()
        .unwrap_or("basic")
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid plan: {:?}", body.plan)))?;

    let credits = plan.credits();
    let key_id = mint_unique_key(state.store.as_ref()).map_err(|e| {
        tracing::error!(error = %e, "Key minting failed");
        ApiError::from(e)
    })?;

    let key = AccessKey::new(key_id.clone(), plan, credits, body.email);
    state.store.create_key(&key)?;

    tracing::info!(
        access_key = %key_id,
        plan = %plan,
        credits,
        "Access key created by admin"
    );

    Ok(Json(CreateKeyResponse {
        success: true,
        access_key: key_id.to_string(),
        plan: plan.to_string(),
        credits,
    }))
}

/// One key in the admin listing.
#[derive(Debug, Serialize)]
pub struct KeySummary {
    /// The access key.
    pub key: String,
    /// Plan granted.
    pub plan: String,
    /// Total credits granted.
    pub credits_total: u32,
    /// Credits consumed so far.
    pub credits_used: u32,
    /// Credits still available.
    pub credits_remaining: u32,
    /// Contact email, if any.
    pub email: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Created timestamp.
    pub created_at: String,
}

impl From<&AccessKey> for KeySummary {
    fn from(key: &AccessKey) -> Self {
        Self {
            key: key.id.to_string(),
            plan: key.plan.to_string(),
            credits_total: key.credits_total,
            credits_used: key.credits_used,
            credits_remaining: key.credits_remaining(),
            email: key.email.clone(),
            status: format!("{:?}", key.status).to_lowercase(),
            created_at: key.created_at.to_rfc3339(),
        }
    }
}

/// Key listing response.
#[derive(Debug, Serialize)]
pub struct ListKeysResponse {
    /// All keys, newest first.
    pub keys: Vec<KeySummary>,
}

/// List every access key, newest first.
pub async fn list_keys(
    State(state): State<Arc<AppState>>,
    _auth: AdminAuth,
) -> Result<Json<ListKeysResponse>, ApiError> {
    let keys = state
        .store
        .list_keys()?
        .iter()
        .map(KeySummary::from)
        .collect();

    Ok(Json(ListKeysResponse { keys }))
}

/// Delete every access key.
pub async fn delete_all_keys(
    State(state): State<Arc<AppState>>,
    _auth: AdminAuth,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.delete_all_keys()?;

    tracing::info!("All access keys deleted by admin");

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Delete all usage, attempt, and payment records. Structure preserved.
pub async fn clear_analytics(
    State(state): State<Arc<AppState>>,
    _auth: AdminAuth,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.clear_analytics()?;

    tracing::info!("Analytics data cleared by admin");

    Ok(Json(serde_json::json!({ "cleared": true })))
}
