//! Multi-agent orchestration for stock-crew
//!
//! A [`Pipeline`] runs its tasks strictly in declaration order. Each task sees
//! the outputs of every earlier task as context, and the last task's output is
//! the pipeline result. The first failing task aborts the run.

pub mod output;
pub mod pipeline;

pub use output::{PipelineOutput, TaskOutput};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineState, Process};
