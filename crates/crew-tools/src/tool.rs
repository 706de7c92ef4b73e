//! Tool trait definition

use async_trait::async_trait;
use crew_core::Result;
use serde_json::Value;

/// Trait for tools that agents can execute
///
/// Each tool provides a name, a description and a JSON schema for its input.
/// Failures are reported as [`crew_core::Error::Capability`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with given parameters
    ///
    /// `params` should match [`Tool::input_schema`]. String results are handed
    /// back to the model verbatim; any other value is serialized as JSON.
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Get the tool's name
    ///
    /// Must be unique within a [`ToolRegistry`](crate::ToolRegistry)
    fn name(&self) -> &str;

    /// Get the tool's description
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    fn input_schema(&self) -> Value;
}
