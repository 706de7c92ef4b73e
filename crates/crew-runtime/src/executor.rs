//! Agent executor for running the provider/tool loop
//!
//! The AgentExecutor implements the loop behind every task:
//! 1. Call the provider with the conversation and the agent's tools
//! 2. Check the stop reason
//! 3. If tool use was requested, execute the tools and loop back
//! 4. If the turn ended, return the final text
//!
//! Nothing is retried. A provider failure, a failing or unknown tool, or an
//! exhausted iteration budget ends the run with [`Error::Capability`].

use crew_core::{Error, Result};
use crew_llm::{
    CompletionRequest, DEFAULT_MAX_TOKENS, LLMProvider, Message, StopReason, TokenUsage,
};
use crew_tools::ToolRegistry;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::agent::DEFAULT_MAX_ITERATIONS;

const PREVIEW_CHARS: usize = 300;

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of provider calls (prevents infinite loops)
    pub max_iterations: usize,

    /// Model to use
    pub model: String,

    /// System prompt
    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,

    /// Log prompts and answers at info level
    pub verbose: bool,
}

impl ExecutorConfig {
    /// Config for a model with default limits
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            model: model.into(),
            system_prompt: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            verbose: false,
        }
    }
}

/// Result of a completed loop
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    /// Final answer text
    pub text: String,

    /// Token usage summed over every provider call
    pub usage: TokenUsage,

    /// Number of provider calls made
    pub iterations: usize,

    /// Number of tool executions
    pub tool_calls: usize,
}

/// Executes an agent loop: provider → tool calls → execution → loop back
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    tools: ToolRegistry,
    config: ExecutorConfig,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(provider: Arc<dyn LLMProvider>, tools: ToolRegistry, config: ExecutorConfig) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute the loop for a single user prompt
    pub async fn run(&self, user_message: impl Into<String>) -> Result<Execution> {
        let mut conversation = vec![Message::user(user_message)];
        let tools = self.tools.definitions();
        let mut usage = TokenUsage::default();
        let mut tool_calls = 0;

        for iteration in 1..=self.config.max_iterations {
            debug!(
                iteration,
                max_iterations = self.config.max_iterations,
                provider = self.provider.name(),
                "Agent iteration started"
            );

            let mut request = CompletionRequest::new(&self.config.model)
                .with_messages(conversation.clone())
                .with_max_tokens(self.config.max_tokens)
                .with_tools(tools.clone());
            if let Some(system) = &self.config.system_prompt {
                request = request.with_system(system.clone());
            }
            if let Some(temperature) = self.config.temperature {
                request = request.with_temperature(temperature);
            }

            let response = self.provider.complete(request).await.map_err(Error::from)?;
            usage += response.usage;

            debug!(
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "Provider response received"
            );

            match response.stop_reason {
                StopReason::ToolUse => {
                    let results = self.execute_tools(&response.message).await?;
                    tool_calls += results.content.len();
                    conversation.push(response.message);
                    conversation.push(results);
                }
                StopReason::EndTurn | StopReason::StopSequence | StopReason::MaxTokens => {
                    let text = response.message.text();
                    if text.trim().is_empty() {
                        warn!(provider = self.provider.name(), "Provider returned an empty answer");
                    }
                    if response.stop_reason == StopReason::MaxTokens {
                        warn!(
                            max_tokens = self.config.max_tokens,
                            "Answer truncated at the token limit"
                        );
                    }

                    if self.config.verbose {
                        info!(iteration, answer = %preview(&text), "Agent final answer");
                    } else {
                        debug!(iteration, response_length = text.len(), "Agent completed");
                    }

                    return Ok(Execution {
                        text,
                        usage,
                        iterations: iteration,
                        tool_calls,
                    });
                }
            }
        }

        warn!(
            max_iterations = self.config.max_iterations,
            "Max iterations reached without a final answer"
        );
        Err(Error::capability(format!(
            "No final answer after {} iterations",
            self.config.max_iterations
        )))
    }

    /// Execute the tool calls of an assistant message, in order
    ///
    /// All results go back in a single user turn.
    async fn execute_tools(&self, message: &Message) -> Result<Message> {
        let tool_uses = message.tool_uses();
        if tool_uses.is_empty() {
            return Err(Error::capability(
                "Provider requested tool use without naming a tool",
            ));
        }

        let mut results = Vec::with_capacity(tool_uses.len());
        for tool_use in tool_uses {
            let tool = self.tools.get(tool_use.name).ok_or_else(|| {
                Error::capability(format!(
                    "Tool '{}' is not available to this agent (available: {:?})",
                    tool_use.name,
                    self.tools.names()
                ))
            })?;

            if self.config.verbose {
                info!(tool = tool_use.name, input = %tool_use.input, "Executing tool");
            } else {
                debug!(tool = tool_use.name, id = tool_use.id, "Executing tool");
            }

            let started = Instant::now();
            let output = tool.execute(tool_use.input.clone()).await.map_err(|e| {
                warn!(tool = tool_use.name, error = %e, "Tool execution failed");
                Error::capability(format!("Tool '{}' failed: {e}", tool_use.name))
            })?;

            let text = match output {
                Value::String(text) => text,
                other => other.to_string(),
            };
            debug!(
                tool = tool_use.name,
                duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                result_length = text.len(),
                "Tool execution succeeded"
            );

            results.push((tool_use.id, text));
        }

        Ok(Message::tool_results(results))
    }
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
