//! Keyword Alchemist HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, HealthResponse, PlansResponse, ProcessKeywordsRequest, ProcessOutcome,
    ValidateKeyRequest, ValidateKeyResponse,
};

/// Keyword Alchemist API client.
///
/// Covers the public surface a frontend needs: key validation, keyword
/// processing, plan listing, and health checks.
#[derive(Debug, Clone)]
pub struct AlchemistClient {
    client: Client,
    base_url: String,
}

impl AlchemistClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service (e.g., `"http://localhost:3002"`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(base_url: impl Into<String>, options: ClientOptions) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Check service health.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/api/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        Self::handle_response(response).await
    }

    /// List the purchasable plans.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn plans(&self) -> Result<PlansResponse, ClientError> {
        let url = format!("{}/api/plans", self.base_url);
        let response = self.client.get(&url).send().await?;
        Self::handle_response(response).await
    }

    /// Validate an access key and fetch its balance.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidKey` if the key is rejected.
    pub async fn validate_key(
        &self,
        access_key: impl Into<String>,
    ) -> Result<ValidateKeyResponse, ClientError> {
        let url = format!("{}/api/auth/validate", self.base_url);
        let request = ValidateKeyRequest {
            access_key: access_key.into(),
        };

        let response = self.client.post(&url).json(&request).send().await?;
        Self::handle_response(response).await
    }

    /// Submit an ordered keyword batch for generation.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidKey` if the key is rejected; an
    /// insufficient balance is not an error but a
    /// [`ProcessOutcome::InsufficientCredits`](crate::ProcessOutcome) value.
    pub async fn process_keywords(
        &self,
        access_key: impl Into<String>,
        keywords: &[String],
    ) -> Result<ProcessOutcome, ClientError> {
        let url = format!("{}/api/keywords/process", self.base_url);
        let request = ProcessKeywordsRequest {
            access_key: access_key.into(),
            keywords: keywords.to_vec(),
        };

        let response = self.client.post(&url).json(&request).send().await?;
        Self::handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse the structured error body
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code;
                if code == "invalid_key" {
                    return Err(ClientError::InvalidKey);
                }
                Err(ClientError::Api {
                    code,
                    message: api_error.error.message,
                    status: status.as_u16(),
                })
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 120; generation is slow).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = AlchemistClient::new("http://localhost:3002/");
        assert_eq!(client.base_url, "http://localhost:3002");
    }

    #[test]
    fn partial_outcome_deserializes() {
        let json = serde_json::json!({
            "success": false,
            "message": "Insufficient credits. 3 credits remaining.",
            "credits_remaining": 3,
            "allowed_keywords": ["a", "b", "c"],
            "rejected_keywords": ["d", "e"]
        });
        let outcome: ProcessOutcome = serde_json::from_value(json).unwrap();
        match outcome {
            ProcessOutcome::InsufficientCredits {
                allowed_keywords,
                rejected_keywords,
                credits_remaining,
                ..
            } => {
                assert_eq!(allowed_keywords.len(), 3);
                assert_eq!(rejected_keywords.len(), 2);
                assert_eq!(credits_remaining, 3);
            }
            ProcessOutcome::Completed { .. } => panic!("expected partial outcome"),
        }
    }

    #[test]
    fn completed_outcome_deserializes() {
        let json = serde_json::json!({
            "success": true,
            "processed": [{
                "keyword": "rust web frameworks",
                "title": "A Guide",
                "tldr": "Short summary.",
                "body": "Body text.",
                "approach": "gemini-1.5-flash"
            }],
            "failed": [],
            "credits_remaining": 9
        });
        let outcome: ProcessOutcome = serde_json::from_value(json).unwrap();
        match outcome {
            ProcessOutcome::Completed {
                processed,
                failed,
                credits_remaining,
            } => {
                assert_eq!(processed.len(), 1);
                assert!(failed.is_empty());
                assert_eq!(credits_remaining, 9);
            }
            ProcessOutcome::InsufficientCredits { .. } => panic!("expected completed outcome"),
        }
    }
}
