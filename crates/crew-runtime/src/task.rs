//! Task definition

use crew_core::{Context, Result};
use crew_llm::TokenUsage;
use std::sync::Arc;
use tracing::{debug, info};

use crate::agent::Agent;

/// One unit of work executed by exactly one agent
#[derive(Debug, Clone)]
pub struct Task {
    description: String,
    expected_output: String,
    agent: Arc<Agent>,
}

/// Output of a successful [`Task::run`]
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRun {
    /// Raw provider answer
    pub text: String,
    pub usage: TokenUsage,
    pub iterations: usize,
    pub tool_calls: usize,
}

impl Task {
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: Arc<Agent>,
    ) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
            agent,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    pub fn agent(&self) -> &Arc<Agent> {
        &self.agent
    }

    /// User prompt for this task given the outputs of earlier tasks
    ///
    /// The expected output is advisory; nothing checks the answer against it.
    pub fn prompt(&self, prior: &Context) -> String {
        let mut prompt = format!("Current Task: {}\n", self.description);

        if !self.expected_output.is_empty() {
            prompt.push_str("\nThis is the expected criteria for your final answer: ");
            prompt.push_str(&self.expected_output);
            prompt.push_str(
                "\nYou MUST return the actual complete content as the final answer, not a summary.\n",
            );
        }

        if !prior.is_empty() {
            prompt.push_str("\nThis is the context you're working with:\n");
            prompt.push_str(&prior.render());
            prompt.push('\n');
        }

        prompt.push_str(
            "\nBegin! This is VERY important to you, use the tools available and give your best \
             Final Answer, your job depends on it!",
        );
        prompt
    }

    /// Run the task on its agent
    ///
    /// # Errors
    ///
    /// Any provider or tool failure is returned as
    /// [`crew_core::Error::Capability`]. No retries are attempted.
    pub async fn run(&self, prior: &Context) -> Result<TaskRun> {
        let agent = &self.agent;
        let prompt = self.prompt(prior);

        if agent.allow_delegation() {
            debug!(role = agent.role(), "Delegation allowed; running on the assigned agent");
        }
        if agent.verbose() {
            info!(
                role = agent.role(),
                provider = agent.provider().name(),
                model = agent.model(),
                context_entries = prior.len(),
                "Working on task"
            );
        }

        let execution = agent.executor().run(prompt).await?;

        Ok(TaskRun {
            text: execution.text,
            usage: execution.usage,
            iterations: execution.iterations,
            tool_calls: execution.tool_calls,
        })
    }
}
