//! Anthropic Claude API client implementation
//!
//! Implements the LlmClient trait for Anthropic's Messages API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::retry::send_with_retry;
use super::{LlmClient, LlmError};
use crate::config::LlmConfig;
use crate::prompts;

/// Anthropic Claude API client
pub struct AnthropicClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    temperature: f32,
}

impl AnthropicClient {
    /// Create a new client from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .get_api_key()
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Build the request body for the Anthropic API
    fn build_request_body(&self, utterance: &str) -> serde_json::Value {
        debug!(%self.model, "build_request_body: called");
        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "system": prompts::INTENT,
            "messages": [
                { "role": "user", "content": utterance },
            ],
        })
    }

    /// Pull the first text block out of the API response
    fn parse_response(&self, api_response: AnthropicResponse) -> Result<String, LlmError> {
        api_response
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| LlmError::InvalidResponse("response contained no text block".to_string()))
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, utterance: &str) -> Result<String, LlmError> {
        debug!(%self.model, "complete: called");

        let request = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", self.api_key.clone())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&self.build_request_body(utterance));

        let response = send_with_retry(request).await?;
        let api_response: AnthropicResponse = response.json().await?;
        self.parse_response(api_response)
    }
}

// Anthropic API response types

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> AnthropicClient {
        AnthropicClient {
            model: "claude-sonnet-4-20250514".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            http: Client::new(),
            max_tokens: 256,
            temperature: 0.1,
        }
    }

    #[test]
    fn test_build_request_body_basic() {
        let body = test_client().build_request_body("show my tasks");

        assert_eq!(body["model"], "claude-sonnet-4-20250514");
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["system"], prompts::INTENT);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "show my tasks");
    }

    #[test]
    fn test_parse_response_finds_text_block() {
        let api_response = AnthropicResponse {
            content: vec![AnthropicContentBlock {
                kind: "text".to_string(),
                text: Some("{\"intent\": \"list_tasks\"}".to_string()),
            }],
        };
        assert_eq!(
            test_client().parse_response(api_response).unwrap(),
            "{\"intent\": \"list_tasks\"}"
        );
    }

    #[test]
    fn test_parse_response_without_text_is_error() {
        let empty = AnthropicResponse { content: vec![] };
        assert!(test_client().parse_response(empty).is_err());

        let wrong_kind = AnthropicResponse {
            content: vec![AnthropicContentBlock {
                kind: "thinking".to_string(),
                text: None,
            }],
        };
        assert!(test_client().parse_response(wrong_kind).is_err());
    }
}
