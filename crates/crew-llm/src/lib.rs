//! Completion provider abstraction for stock-crew
//!
//! This crate provides provider-agnostic abstractions for the text-completion
//! capability that backs every agent. It includes:
//!
//! - Message types for provider communication, including tool use
//! - Completion request/response types
//! - Tool definitions advertised to the provider
//! - The [`LLMProvider`] trait and a [`ProviderRegistry`] binding identifiers to clients
//! - Concrete Gemini and Groq providers (behind feature flags)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod registry;
pub mod tools;

#[cfg(any(feature = "gemini", feature = "groq"))]
pub mod providers;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

// Re-export main types
pub use completion::{
    CompletionRequest, CompletionResponse, DEFAULT_MAX_TOKENS, StopReason, TokenUsage,
};
pub use error::{LLMError, Result};
pub use messages::{ContentBlock, Message, Role, ToolUse};
pub use provider::LLMProvider;
pub use registry::ProviderRegistry;
pub use tools::ToolDefinition;
