//! Client for the three generation calls.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::content::GenerateContentRequest;
use crate::error::{ApiResult, ApiServiceError};
use crate::models::{GameLevel, LevelPair, MarketAnalysis, PrototypeResult};
use crate::prompts;
use crate::transport::{GeminiTransport, ModelTransport};

/// Finish reason of a normally completed generation.
const FINISH_STOP: &str = "STOP";

/// Issues market analysis, level and prototype requests.
///
/// Every operation fails with `INVALID_KEY` before touching the transport
/// when no API key is configured, and only ever returns
/// [`ApiServiceError`].
pub struct ForgeClient {
    transport: Arc<dyn ModelTransport>,
    config: ClientConfig,
}

impl ForgeClient {
    pub fn new(transport: Arc<dyn ModelTransport>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Client talking to the Gemini REST API at `config.base_url`.
    pub fn gemini(config: ClientConfig) -> Self {
        let transport = GeminiTransport::new(config.base_url.clone());
        Self::new(Arc::new(transport), config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn has_api_key(&self) -> bool {
        self.config.has_api_key()
    }

    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.config.api_key = Some(key.into());
    }

    pub async fn generate_market_analysis(&self, genre: &str) -> ApiResult<MarketAnalysis> {
        info!(genre, "Generating market analysis");

        let request = GenerateContentRequest::prompt(prompts::market_analysis_prompt(genre))
            .with_json_schema(prompts::market_analysis_schema());
        let text = self.request_text(&self.config.analysis_model, &request).await?;

        parse_json(&text)
    }

    pub async fn generate_game_levels(
        &self,
        genre: &str,
        analysis: &MarketAnalysis,
    ) -> ApiResult<LevelPair> {
        info!(genre, "Generating game levels");

        let request = GenerateContentRequest::prompt(prompts::game_levels_prompt(genre, analysis))
            .with_json_schema(prompts::game_levels_schema());
        let text = self.request_text(&self.config.level_model, &request).await?;

        parse_json(&text)
    }

    pub async fn generate_prototype(&self, level: &GameLevel) -> ApiResult<PrototypeResult> {
        info!("Generating prototype");

        let request = GenerateContentRequest::prompt(prompts::prototype_prompt(level))
            .with_temperature(self.config.prototype_temperature);
        let text = self.request_text(&self.config.prototype_model, &request).await?;

        let result = PrototypeResult::from_model_output(&text);
        if !result.is_html() {
            info!(reason = result.content(), "Model reported the prototype as unfeasible");
        }
        Ok(result)
    }

    fn api_key(&self) -> ApiResult<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ApiServiceError::invalid_key("API key is not configured."))
    }

    // Send a request and return the response text; whitespace is left to the caller
    async fn request_text(&self, model: &str, request: &GenerateContentRequest) -> ApiResult<String> {
        let api_key = self.api_key()?;

        debug!(model, schema = request.response_schema().is_some(), "Calling model");
        let response = self.transport.generate_content(api_key, model, request).await?;

        if let Some(reason) = response.block_reason() {
            warn!(reason, "Prompt was blocked");
            return Err(ApiServiceError::blocked(reason));
        }
        if let Some(reason) = response.finish_reason() {
            if !reason.eq_ignore_ascii_case(FINISH_STOP) {
                warn!(reason, "Generation did not finish normally");
                return Err(ApiServiceError::blocked(reason));
            }
        }

        response
            .text()
            .ok_or_else(|| ApiServiceError::bad_response("The model returned an empty response."))
    }
}

fn parse_json<T: DeserializeOwned>(text: &str) -> ApiResult<T> {
    serde_json::from_str(text.trim()).map_err(|e| {
        warn!(error = %e, "Model returned malformed data");
        ApiServiceError::bad_response(format!("The model returned malformed data: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, TransportError};
    use crate::mock::{MockReply, MockTransport};
    use serde_json::json;

    fn client(transport: &MockTransport) -> ForgeClient {
        ForgeClient::new(
            Arc::new(transport.clone()),
            ClientConfig::default().with_api_key("test-key"),
        )
    }

    fn analysis_json() -> serde_json::Value {
        json!({
            "trends": ["a", "b", "c"],
            "mechanics": ["d", "e", "f"],
            "monetization": ["g", "h", "i"]
        })
    }

    fn tiny_level() -> GameLevel {
        serde_json::from_value(json!({
            "level_description": "tiny",
            "tilemap": [["#", "#"], ["#", "."]],
            "entities": [],
            "player_start": {"x": 1, "y": 1},
            "goal_position": {"x": 1, "y": 1},
            "solvable_path": [],
            "validity_check": "ok"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_market_analysis_success() {
        let transport = MockTransport::new().add_reply(MockReply::json(&analysis_json()));
        let analysis = client(&transport)
            .generate_market_analysis("Roguelike")
            .await
            .unwrap();

        assert_eq!(analysis.trends, vec!["a", "b", "c"]);
        assert_eq!(analysis.monetization.len(), 3);

        let calls = transport.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].api_key, "test-key");
        assert_eq!(calls[0].model, "gemini-2.5-flash");
        assert!(calls[0].is_schema_constrained());
        assert!(calls[0].prompt().contains("Roguelike"));
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let transport = MockTransport::new().add_reply(MockReply::json(&analysis_json()));
        let client = ForgeClient::new(Arc::new(transport.clone()), ClientConfig::default());

        let err = client.generate_market_analysis("Roguelike").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidKey);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_lowercase_stop_is_normal_completion() {
        let transport = MockTransport::new()
            .add_reply(MockReply::finished("stop", analysis_json().to_string()));
        assert!(client(&transport).generate_market_analysis("x").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_finish_reason_is_accepted() {
        let mut response = crate::content::GenerateContentResponse::from_text(analysis_json().to_string());
        response.candidates[0].finish_reason = None;
        let transport = MockTransport::new().add_reply(MockReply::Response(response));

        assert!(client(&transport).generate_market_analysis("x").await.is_ok());
    }

    #[tokio::test]
    async fn test_prompt_block_is_response_blocked() {
        let transport = MockTransport::new().add_reply(MockReply::Response(
            crate::content::GenerateContentResponse::prompt_blocked("PROHIBITED_CONTENT"),
        ));
        let err = client(&transport).generate_market_analysis("x").await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::ResponseBlocked);
        assert!(err.message.contains("PROHIBITED_CONTENT"));
    }

    #[tokio::test]
    async fn test_whitespace_only_json_is_malformed() {
        let transport = MockTransport::new().add_reply(MockReply::text("  \n "));
        let err = client(&transport).generate_market_analysis("x").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadResponse);
        assert!(err.message.contains("malformed data"));
    }

    #[tokio::test]
    async fn test_whitespace_only_prototype_is_html() {
        let transport = MockTransport::new().add_reply(MockReply::text("  \n"));
        let result = client(&transport).generate_prototype(&tiny_level()).await.unwrap();

        assert_eq!(result, PrototypeResult::Html(format!("{}  \n", crate::models::STYLE_PREAMBLE)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_classified() {
        let transport = MockTransport::new()
            .add_reply(MockReply::failure(TransportError::status(429, "Resource exhausted")));
        let err = client(&transport).generate_market_analysis("x").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::RateLimit);
    }

    #[tokio::test]
    async fn test_prototype_uses_low_temperature_without_schema() {
        let transport = MockTransport::new().add_reply(MockReply::text("<canvas></canvas>"));
        let result = client(&transport).generate_prototype(&tiny_level()).await.unwrap();
        assert!(result.is_html());

        let calls = transport.get_calls();
        assert_eq!(calls[0].model, "gemini-2.5-pro");
        assert!(!calls[0].is_schema_constrained());
        assert_eq!(calls[0].request.temperature(), Some(0.2));
    }

    #[test]
    fn test_set_api_key() {
        let mut client = ForgeClient::new(Arc::new(MockTransport::new()), ClientConfig::default());
        assert!(!client.has_api_key());

        client.set_api_key("late-key");
        assert!(client.has_api_key());
        assert_eq!(client.api_key().unwrap(), "late-key");
    }
}
