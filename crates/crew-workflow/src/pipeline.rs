//! Pipeline definition and execution

use chrono::Utc;
use crew_core::{Context, Error, Result};
use crew_runtime::{Agent, Task};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::output::{PipelineOutput, TaskOutput};

/// How tasks are scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Process {
    /// One task at a time, in declaration order
    #[default]
    Sequential,
}

/// Lifecycle of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Built, not yet started
    Pending,
    /// Task at this index is executing
    Running(usize),
    /// Every task succeeded
    Completed,
    /// Task at this index failed; later tasks never ran
    Failed { index: usize },
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running(index) => write!(f, "running task {index}"),
            Self::Completed => write!(f, "completed"),
            Self::Failed { index } => write!(f, "failed at task {index}"),
        }
    }
}

/// An ordered set of tasks run once against a fixed set of agents
///
/// # Example
///
/// ```no_run
/// use crew_workflow::{Pipeline, Process};
/// # use crew_runtime::{Agent, Task};
/// # use std::sync::Arc;
///
/// # async fn example(analyst: Arc<Agent>, writer: Arc<Agent>) -> crew_core::Result<()> {
/// let mut pipeline = Pipeline::builder()
///     .agent(Arc::clone(&analyst))
///     .agent(Arc::clone(&writer))
///     .task(Task::new("Analyse the market", "Key findings", analyst))
///     .task(Task::new("Write the report", "A report", writer))
///     .process(Process::Sequential)
///     .build();
///
/// let output = pipeline.kickoff().await?;
/// println!("{}", output.raw);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    agents: Vec<Arc<Agent>>,
    tasks: Vec<Task>,
    process: Process,
    state: PipelineState,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn agents(&self) -> &[Arc<Agent>] {
        &self.agents
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn process(&self) -> Process {
        self.process
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run every task in order and return the final task's output
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`] when the agent or task list is empty, or the
    ///   pipeline has already been started. No provider is called.
    /// - [`Error::TaskFailed`] carrying the index and role of the first failing
    ///   task. No later task runs and no partial output is returned.
    pub async fn kickoff(&mut self) -> Result<PipelineOutput> {
        if self.state != PipelineState::Pending {
            return Err(Error::configuration(format!(
                "Pipeline can only be run once (state: {})",
                self.state
            )));
        }
        self.validate()?;

        info!(
            tasks = self.tasks.len(),
            agents = self.agents.len(),
            process = ?self.process,
            "Pipeline started"
        );

        let mut context = Context::new();
        let mut outputs = Vec::with_capacity(self.tasks.len());

        for (index, task) in self.tasks.iter().enumerate() {
            self.state = PipelineState::Running(index);
            let role = task.agent().role().to_string();
            info!(index, role = %role, "Task started");

            let started_at = Utc::now();
            let run = match task.run(&context).await {
                Ok(run) => run,
                Err(source) => {
                    self.state = PipelineState::Failed { index };
                    error!(index, role = %role, error = %source, "Task failed, aborting pipeline");
                    return Err(Error::TaskFailed {
                        index,
                        role,
                        source: Box::new(source),
                    });
                }
            };
            let finished_at = Utc::now();

            info!(
                index,
                role = %role,
                output_length = run.text.len(),
                tokens = run.usage.total(),
                "Task completed"
            );

            context.push(role.clone(), run.text.clone());
            outputs.push(TaskOutput {
                index,
                role,
                description: task.description().to_string(),
                raw: run.text,
                usage: run.usage,
                iterations: run.iterations,
                tool_calls: run.tool_calls,
                started_at,
                finished_at,
            });
        }

        self.state = PipelineState::Completed;
        let output = PipelineOutput::from_tasks(outputs);
        info!(
            tokens = output.token_usage.total(),
            duration_ms = output.duration().num_milliseconds(),
            "Pipeline completed"
        );
        Ok(output)
    }

    fn validate(&self) -> Result<()> {
        if self.agents.is_empty() {
            return Err(Error::configuration("Pipeline has no agents"));
        }
        if self.tasks.is_empty() {
            return Err(Error::configuration("Pipeline has no tasks"));
        }

        for (index, task) in self.tasks.iter().enumerate() {
            if !self.agents.iter().any(|a| Arc::ptr_eq(a, task.agent())) {
                warn!(
                    index,
                    role = task.agent().role(),
                    "Task agent is not part of the pipeline's agent list"
                );
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("agents", &self.agents.iter().map(|a| a.role()).collect::<Vec<_>>())
            .field("tasks", &self.tasks.len())
            .field("process", &self.process)
            .field("state", &self.state)
            .finish()
    }
}

/// Builder for constructing pipelines
#[derive(Default)]
pub struct PipelineBuilder {
    agents: Vec<Arc<Agent>>,
    tasks: Vec<Task>,
    process: Process,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an agent to the pipeline
    pub fn agent(mut self, agent: Arc<Agent>) -> Self {
        self.agents.push(agent);
        self
    }

    /// Add several agents, keeping their order
    pub fn agents(mut self, agents: impl IntoIterator<Item = Arc<Agent>>) -> Self {
        self.agents.extend(agents);
        self
    }

    /// Append a task; tasks run in the order they are added
    pub fn task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Append several tasks, keeping their order
    pub fn tasks(mut self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.tasks.extend(tasks);
        self
    }

    pub fn process(mut self, process: Process) -> Self {
        self.process = process;
        self
    }

    /// Build the pipeline
    ///
    /// Emptiness is checked when the pipeline is started.
    pub fn build(self) -> Pipeline {
        Pipeline {
            agents: self.agents,
            tasks: self.tasks,
            process: self.process,
            state: PipelineState::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_llm::test_support::ScriptedProvider;
    use tokio_test::{assert_err, assert_ok};

    fn agent(role: &str, provider: Arc<ScriptedProvider>) -> Arc<Agent> {
        Arc::new(
            Agent::builder(role)
                .provider(provider)
                .model("test-model")
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_state_display() {
        assert_eq!(PipelineState::Running(2).to_string(), "running task 2");
        assert_eq!(
            PipelineState::Failed { index: 1 }.to_string(),
            "failed at task 1"
        );
    }

    #[tokio::test]
    async fn test_single_task() {
        let provider = Arc::new(ScriptedProvider::text("p", "only"));
        let analyst = agent("Analyst", provider);
        let mut pipeline = Pipeline::builder()
            .agent(Arc::clone(&analyst))
            .task(Task::new("Do it", "", analyst))
            .build();

        assert_eq!(pipeline.state(), PipelineState::Pending);
        let output = assert_ok!(pipeline.kickoff().await);
        assert_eq!(output.raw, "only");
        assert_eq!(output.tasks_output.len(), 1);
        assert_eq!(pipeline.state(), PipelineState::Completed);
    }

    #[tokio::test]
    async fn test_second_kickoff_rejected() {
        let provider = Arc::new(ScriptedProvider::new("p").then_text("one").then_text("two"));
        let analyst = agent("Analyst", Arc::clone(&provider));
        let mut pipeline = Pipeline::builder()
            .agent(Arc::clone(&analyst))
            .task(Task::new("Do it", "", analyst))
            .build();

        assert_ok!(pipeline.kickoff().await);
        let err = assert_err!(pipeline.kickoff().await);
        assert!(err.is_configuration());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_no_tasks() {
        let provider = Arc::new(ScriptedProvider::text("p", "unused"));
        let mut pipeline = Pipeline::builder()
            .agent(agent("Analyst", Arc::clone(&provider)))
            .build();

        let err = assert_err!(pipeline.kickoff().await);
        assert!(err.is_configuration());
        assert_eq!(pipeline.state(), PipelineState::Pending);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_task_agent_outside_list_still_runs() {
        let listed = agent("Listed", Arc::new(ScriptedProvider::new("a")));
        let provider = Arc::new(ScriptedProvider::text("b", "ran"));
        let other = agent("Other", provider);

        let mut pipeline = Pipeline::builder()
            .agent(listed)
            .task(Task::new("Do it", "", other))
            .build();

        let output = assert_ok!(pipeline.kickoff().await);
        assert_eq!(output.raw, "ran");
    }
}
