//! Authentication extractors.
//!
//! End users authenticate with their access key in the request body, so the
//! only header-based auth here is the admin surface: requests must carry the
//! configured key in `x-admin-key`.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// Admin authentication via API key.
///
/// Rejects every request when no admin key is configured: the admin surface
/// is locked unless explicitly opened.
#[derive(Debug, Clone)]
pub struct AdminAuth;

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get("x-admin-key")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let expected = state
            .config
            .admin_api_key
            .as_ref()
            .ok_or(ApiError::Unauthorized)?;

        if presented != expected {
            return Err(ApiError::Unauthorized);
        }

        Ok(Self)
    }
}
