//! Remote collaborator that validates a draft against the cloud's own
//! continuation. Grounded in the teacher's `reqwest::Client`-holding struct
//! shape (`ExecutionEngine`) and its `Deployer`-trait-for-testability
//! pattern, here applied to an async verification call.

use std::time::Duration;

use async_trait::async_trait;
use common::{AppError, AppResult, VerifyRequest, VerifyResponse};

#[async_trait]
pub trait VerifierClient: Send + Sync {
    async fn verify(&self, request: VerifyRequest, timeout: Duration) -> AppResult<VerifyResponse>;
    async fn infer_direct(&self, prompt: &str, max_tokens: u32, timeout: Duration) -> AppResult<String>;
}

pub struct HttpVerifierClient {
    client: reqwest::Client,
    cloud_endpoint: String,
}

impl HttpVerifierClient {
    pub fn new(cloud_endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            cloud_endpoint: cloud_endpoint.into(),
        }
    }
}

#[async_trait]
impl VerifierClient for HttpVerifierClient {
    async fn verify(&self, request: VerifyRequest, timeout: Duration) -> AppResult<VerifyResponse> {
        let url = format!("{}/verify", self.cloud_endpoint.trim_end_matches('/'));
        let response = tokio::time::timeout(timeout, self.client.post(&url).json(&request).send())
            .await
            .map_err(|_| AppError::Transient("verify request timed out".to_string()))?
            .map_err(|e| AppError::Transient(format!("verify request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Transient(format!("verify returned status {}", response.status())));
        }

        response
            .json::<VerifyResponse>()
            .await
            .map_err(|e| AppError::Transient(format!("verify response malformed: {e}")))
    }

    async fn infer_direct(&self, prompt: &str, max_tokens: u32, timeout: Duration) -> AppResult<String> {
        let url = format!("{}/inference/direct", self.cloud_endpoint.trim_end_matches('/'));
        let body = serde_json::json!({ "prompt": prompt, "max_tokens": max_tokens });

        let response = tokio::time::timeout(timeout, self.client.post(&url).json(&body).send())
            .await
            .map_err(|_| AppError::Transient("direct inference request timed out".to_string()))?
            .map_err(|e| AppError::Transient(format!("direct inference request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Transient(format!("direct inference returned status {}", response.status())));
        }

        #[derive(serde::Deserialize)]
        struct DirectResponse {
            text: String,
        }
        let parsed: DirectResponse = response
            .json()
            .await
            .map_err(|e| AppError::Transient(format!("direct inference response malformed: {e}")))?;
        Ok(parsed.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_cloud_surfaces_as_transient() {
        let client = HttpVerifierClient::new("http://127.0.0.1:1");
        let request = VerifyRequest {
            prompt: "hi".to_string(),
            draft_text: "there".to_string(),
            confidence_threshold: 0.8,
        };
        let result = client.verify(request, Duration::from_millis(200)).await;
        assert!(matches!(result, Err(AppError::Transient(_))));
    }
}
