//! LlmClient trait definition

use async_trait::async_trait;

use super::LlmError;

/// Stateless classifier transport - each call is independent
///
/// One utterance in, raw model text out. Implementations carry the system
/// prompt and provider plumbing; interpreting the payload happens above
/// them, in one place.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single utterance for classification.
    async fn complete(&self, utterance: &str) -> Result<String, LlmError>;
}
