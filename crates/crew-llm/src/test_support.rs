//! Scripted provider for tests
//!
//! [`ScriptedProvider`] answers each call with the next scripted reply and
//! records every request it receives, so tests can assert on call order and
//! on the prompt each agent was given.

use crate::{
    CompletionRequest, CompletionResponse, ContentBlock, LLMError, LLMProvider, Message, Result,
    Role, StopReason, TokenUsage,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Usage reported for every scripted reply
pub const SCRIPTED_USAGE: TokenUsage = TokenUsage {
    input_tokens: 10,
    output_tokens: 5,
};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    ToolUse(Vec<ContentBlock>),
    Fail(String),
}

/// Provider returning canned replies in order
#[derive(Debug)]
pub struct ScriptedProvider {
    name: String,
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    /// Create a provider with an empty script
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Provider whose only reply is the given text
    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).then_text(text)
    }

    /// Provider whose only reply is a failure
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name).then_fail(message)
    }

    /// Queue a final text answer
    pub fn then_text(self, text: impl Into<String>) -> Self {
        self.push(Reply::Text(text.into()))
    }

    /// Queue a tool use request
    pub fn then_tool_use(
        self,
        id: impl Into<String>,
        name: impl Into<String>,
        input: Value,
    ) -> Self {
        self.then_tool_uses([(id, name, input)])
    }

    /// Queue several tool use requests issued in the same turn
    pub fn then_tool_uses<I, S, N>(self, calls: I) -> Self
    where
        I: IntoIterator<Item = (S, N, Value)>,
        S: Into<String>,
        N: Into<String>,
    {
        self.push(Reply::ToolUse(
            calls
                .into_iter()
                .map(|(id, name, input)| ContentBlock::ToolUse {
                    id: id.into(),
                    name: name.into(),
                    input,
                })
                .collect(),
        ))
    }

    /// Queue a provider failure
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.push(Reply::Fail(message.into()))
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls received
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Text of the last user message of the given call
    pub fn prompt_of(&self, call: usize) -> Option<String> {
        self.requests()
            .get(call)
            .and_then(|r| r.messages.iter().find(|m| m.role == Role::User))
            .map(Message::text)
    }

    fn push(self, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| LLMError::RequestFailed(format!("{}: script exhausted", self.name)))?;

        match reply {
            Reply::Text(text) => Ok(CompletionResponse {
                message: Message::assistant(text),
                stop_reason: StopReason::EndTurn,
                usage: SCRIPTED_USAGE,
            }),
            Reply::ToolUse(calls) => Ok(CompletionResponse {
                message: Message::new(Role::Assistant, calls),
                stop_reason: StopReason::ToolUse,
                usage: SCRIPTED_USAGE,
            }),
            Reply::Fail(message) => Err(LLMError::RequestFailed(message)),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order_and_records_requests() {
        let provider = ScriptedProvider::new("mock").then_text("one").then_fail("boom");

        let first = provider
            .complete(CompletionRequest::new("m").with_message(Message::user("hi")))
            .await
            .unwrap();
        assert_eq!(first.message.text(), "one");

        let second = provider.complete(CompletionRequest::new("m")).await;
        assert!(matches!(second, Err(LLMError::RequestFailed(ref m)) if m == "boom"));

        let third = provider.complete(CompletionRequest::new("m")).await;
        assert!(third.is_err());

        assert_eq!(provider.call_count(), 3);
        assert_eq!(provider.prompt_of(0).as_deref(), Some("hi"));
    }
}
