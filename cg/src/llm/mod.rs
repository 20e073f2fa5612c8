//! LLM classifier module
//!
//! The transport trait, its provider implementations, and the `classify`
//! entry point that turns raw model text into an always-valid intent.

use std::sync::Arc;

use tracing::{debug, warn};

mod anthropic;
pub mod client;
mod error;
mod openai;
mod retry;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use openai::OpenAIClient;

use crate::config::LlmConfig;
use crate::intent::ClassifiedIntent;

/// Create an LLM client based on the provider specified in config
///
/// Supports "anthropic" and "openai" providers.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "anthropic" => Ok(Arc::new(AnthropicClient::from_config(config)?)),
        "openai" => Ok(Arc::new(OpenAIClient::from_config(config)?)),
        other => Err(LlmError::InvalidResponse(format!(
            "Unknown LLM provider: '{}'. Supported: anthropic, openai",
            other
        ))),
    }
}

/// Classify one utterance, absorbing every failure into the help fallback.
///
/// Transport errors and malformed payloads land on the same
/// [`ClassifiedIntent::fallback`]; callers always get a valid intent.
pub async fn classify(llm: &Arc<dyn LlmClient>, utterance: &str) -> ClassifiedIntent {
    match llm.complete(utterance).await {
        Ok(raw) => ClassifiedIntent::from_classifier_output(&raw),
        Err(e) => {
            warn!(error = %e, "classifier call failed, using fallback intent");
            ClassifiedIntent::fallback()
        }
    }
}
