//! Agent definition and builder

use crew_core::{Error, Result};
use crew_llm::{DEFAULT_MAX_TOKENS, LLMProvider};
use crew_tools::{Tool, ToolRegistry};
use std::fmt;
use std::sync::Arc;

use crate::executor::{AgentExecutor, ExecutorConfig};

/// Bound on provider round-trips for a single task
pub const DEFAULT_MAX_ITERATIONS: usize = 15;

/// Sampling temperature used when none is configured
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// A persona bound to exactly one completion provider
///
/// Agents are immutable after [`AgentBuilder::build`]; tasks hold them through
/// an `Arc` and never own them.
pub struct Agent {
    role: String,
    goal: String,
    backstory: String,
    provider: Arc<dyn LLMProvider>,
    tools: ToolRegistry,
    allow_delegation: bool,
    verbose: bool,
    max_iterations: usize,
    model: String,
    temperature: f32,
    max_tokens: usize,
}

impl Agent {
    /// Start building an agent with the given role
    pub fn builder(role: impl Into<String>) -> AgentBuilder {
        AgentBuilder::new(role)
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn backstory(&self) -> &str {
        &self.backstory
    }

    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Whether the agent may hand work to other agents
    ///
    /// The flag is recorded and reported; tasks always run on their own agent.
    pub fn allow_delegation(&self) -> bool {
        self.allow_delegation
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Persona used as the system prompt of every request
    pub fn system_prompt(&self) -> String {
        let mut prompt = format!("You are {}.", self.role);
        if !self.backstory.is_empty() {
            prompt.push(' ');
            prompt.push_str(&self.backstory);
        }
        if !self.goal.is_empty() {
            prompt.push_str("\nYour personal goal is: ");
            prompt.push_str(&self.goal);
        }
        prompt
    }

    /// Executor running this agent's provider/tool loop
    pub fn executor(&self) -> AgentExecutor {
        AgentExecutor::new(
            Arc::clone(&self.provider),
            self.tools.clone(),
            ExecutorConfig {
                max_iterations: self.max_iterations,
                model: self.model.clone(),
                system_prompt: Some(self.system_prompt()),
                max_tokens: self.max_tokens,
                temperature: Some(self.temperature),
                verbose: self.verbose,
            },
        )
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("tools", &self.tools)
            .field("allow_delegation", &self.allow_delegation)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Agent`]
pub struct AgentBuilder {
    role: String,
    goal: String,
    backstory: String,
    provider: Option<Arc<dyn LLMProvider>>,
    tools: ToolRegistry,
    allow_delegation: bool,
    verbose: bool,
    max_iterations: usize,
    model: Option<String>,
    temperature: f32,
    max_tokens: usize,
}

impl AgentBuilder {
    /// Create a new builder
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            goal: String::new(),
            backstory: String::new(),
            provider: None,
            tools: ToolRegistry::new(),
            allow_delegation: false,
            verbose: false,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    pub fn backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = backstory.into();
        self
    }

    /// Set the completion provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Add a tool; registration order is preserved
    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.register(tool);
        self
    }

    /// Replace the tool set
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn allow_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build the agent
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the role or model is empty, no
    /// provider is bound, or a numeric limit is zero.
    pub fn build(self) -> Result<Agent> {
        if self.role.trim().is_empty() {
            return Err(Error::configuration("Agent role cannot be empty"));
        }

        let provider = self.provider.ok_or_else(|| {
            Error::configuration(format!("Agent '{}' has no provider", self.role))
        })?;

        let model = self
            .model
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| Error::configuration(format!("Agent '{}' has no model", self.role)))?;

        if self.max_iterations == 0 {
            return Err(Error::configuration("max_iterations must be at least 1"));
        }
        if self.max_tokens == 0 {
            return Err(Error::configuration("max_tokens must be at least 1"));
        }

        Ok(Agent {
            role: self.role,
            goal: self.goal,
            backstory: self.backstory,
            provider,
            tools: self.tools,
            allow_delegation: self.allow_delegation,
            verbose: self.verbose,
            max_iterations: self.max_iterations,
            model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        })
    }
}
