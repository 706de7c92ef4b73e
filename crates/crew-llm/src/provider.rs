//! Completion provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for completion providers
///
/// Implementations wrap a hosted text-generation service (Gemini, Groq).
/// A call either returns the provider's answer or fails; implementations do
/// not retry.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion
    ///
    /// # Arguments
    ///
    /// * `request` - System prompt, conversation, tools and sampling parameters
    ///
    /// # Returns
    ///
    /// The assistant message, why generation stopped, and token usage
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "gemini", "groq")
    fn name(&self) -> &str;
}
