//! Transport seam between the client and the model API.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::content::{GenerateContentRequest, GenerateContentResponse};
use crate::error::{TransportError, TransportResult};

/// Sends one `generateContent` request.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> TransportResult<GenerateContentResponse>;
}

/// HTTP transport for the Gemini REST API.
pub struct GeminiTransport {
    base_url: String,
    client: reqwest::Client,
}

impl GeminiTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl ModelTransport for GeminiTransport {
    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> TransportResult<GenerateContentResponse> {
        let url = self.endpoint(model);
        debug!(%url, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::status(
                status.as_u16(),
                api_error_message(&body).unwrap_or_else(|| format!("Gemini API error {}: {}", status, body)),
            ));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| TransportError::decode(format!("Failed to parse response: {}", e)))
    }
}

// Error envelope returned by Google APIs
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
}
