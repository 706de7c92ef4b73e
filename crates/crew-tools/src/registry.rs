//! Tool registry for the tools bound to one agent

use crate::Tool;
use crew_llm::ToolDefinition;
use std::fmt;
use std::sync::Arc;

/// Ordered, immutable-after-construction set of tools
///
/// Registration order is the order in which definitions are advertised to the
/// provider. Registering a second tool with an existing name replaces the
/// first one in place.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of tools
    pub fn from_tools(tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool);
        }
        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(index) => self.tools[index] = tool,
            None => self.tools.push(tool),
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// List all registered tools in registration order
    pub fn list_tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Names of the registered tools in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Tool definitions to send to the completion provider
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition::new(t.name(), t.description(), t.input_schema()))
            .collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::MockTool;
    use serde_json::json;

    fn mock_tool(name: &'static str, description: &'static str) -> Arc<dyn Tool> {
        let mut tool = MockTool::new();
        tool.expect_name().return_const(name.to_string());
        tool.expect_description().return_const(description.to_string());
        tool.expect_input_schema()
            .returning(|| json!({"type": "object"}));
        Arc::new(tool)
    }

    #[test]
    fn test_registration_order_is_kept() {
        let registry = ToolRegistry::from_tools([
            mock_tool("search", "web"),
            mock_tool("quote", "prices"),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["search", "quote"]);
        let definitions = registry.definitions();
        assert_eq!(definitions[0].name, "search");
        assert_eq!(definitions[1].description, "prices");
    }

    #[test]
    fn test_duplicate_name_replaces_in_place() {
        let registry = ToolRegistry::from_tools([
            mock_tool("search", "old"),
            mock_tool("quote", "prices"),
            mock_tool("search", "new"),
        ]);

        assert_eq!(registry.names(), vec!["search", "quote"]);
        assert_eq!(registry.get("search").unwrap().description(), "new");
    }

    #[test]
    fn test_missing_tool() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("search").is_none());
    }
}
