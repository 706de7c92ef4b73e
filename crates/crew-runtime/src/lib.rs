//! Agent and task runtime for stock-crew
//!
//! An [`Agent`] is an immutable persona bound to one completion provider and
//! an ordered set of tools. A [`Task`] is one unit of work assigned to an
//! agent; running it drives the [`AgentExecutor`] loop until the provider
//! gives a final answer.

pub mod agent;
pub mod executor;
pub mod task;

pub use agent::{
    Agent, AgentBuilder, DEFAULT_MAX_ITERATIONS, DEFAULT_TEMPERATURE,
};
pub use executor::{AgentExecutor, Execution, ExecutorConfig};
pub use task::{Task, TaskRun};
