//! Message types for provider communication
//!
//! A conversation is a list of [`Message`]s, each holding ordered content
//! blocks. Tool calls travel as [`ContentBlock::ToolUse`] in assistant
//! messages and their answers as [`ContentBlock::ToolResult`] in user messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message role in a conversation
///
/// System instructions are carried by [`crate::CompletionRequest::system`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User (or tool result) message
    User,
    /// Assistant message
    Assistant,
}

/// Content block in a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text content
    Text {
        /// Text content
        text: String,
    },

    /// Tool use request from the assistant
    ToolUse {
        /// Identifier the matching result must echo
        id: String,
        /// Tool name
        name: String,
        /// Tool input parameters (JSON)
        input: Value,
    },

    /// Tool result sent back to the assistant
    ToolResult {
        /// ID of the tool use this is responding to
        tool_use_id: String,
        /// Result content
        content: String,
        /// Whether this is an error result
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
}

/// Borrowed view of a tool use request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolUse<'a> {
    /// Tool use identifier
    pub id: &'a str,
    /// Tool name
    pub name: &'a str,
    /// Tool input
    pub input: &'a Value,
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Ordered content blocks
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a message from blocks
    pub fn new(role: Role, content: Vec<ContentBlock>) -> Self {
        Self { role, content }
    }

    /// Create a user message with text
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![ContentBlock::Text { text: text.into() }])
    }

    /// Create an assistant message with text
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(
            Role::Assistant,
            vec![ContentBlock::Text { text: text.into() }],
        )
    }

    /// Create a user message carrying one tool result
    pub fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(
            Role::User,
            vec![ContentBlock::ToolResult {
                tool_use_id: tool_use_id.into(),
                content: content.into(),
                is_error: false,
            }],
        )
    }

    /// Create a user message answering every tool call of one turn
    pub fn tool_results<I, S, T>(results: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self::new(
            Role::User,
            results
                .into_iter()
                .map(|(tool_use_id, content)| ContentBlock::ToolResult {
                    tool_use_id: tool_use_id.into(),
                    content: content.into(),
                    is_error: false,
                })
                .collect(),
        )
    }

    /// All text blocks joined with newlines
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Tool use requests, in the order the provider emitted them
    pub fn tool_uses(&self) -> Vec<ToolUse<'_>> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse { id, name, input } => Some(ToolUse { id, name, input }),
                _ => None,
            })
            .collect()
    }

    /// Check if this message contains any tool uses
    pub fn has_tool_uses(&self) -> bool {
        self.content
            .iter()
            .any(|block| matches!(block, ContentBlock::ToolUse { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_message() {
        let msg = Message::user("Olá");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text(), "Olá");
        assert!(!msg.has_tool_uses());
    }

    #[test]
    fn test_text_joins_blocks() {
        let msg = Message::new(
            Role::Assistant,
            vec![
                ContentBlock::Text {
                    text: "first".to_string(),
                },
                ContentBlock::ToolUse {
                    id: "call_1".to_string(),
                    name: "duckduckgo_search".to_string(),
                    input: json!({"query": "PETR4"}),
                },
                ContentBlock::Text {
                    text: "second".to_string(),
                },
            ],
        );

        assert_eq!(msg.text(), "first\nsecond");
        let uses = msg.tool_uses();
        assert_eq!(uses.len(), 1);
        assert_eq!(uses[0].name, "duckduckgo_search");
        assert_eq!(uses[0].input["query"], "PETR4");
    }

    #[test]
    fn test_tool_result_serialization() {
        let msg = Message::tool_result("call_1", "result");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["content"][0]["type"], "tool_result");
        assert!(json["content"][0].get("is_error").is_none());

        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }
}
