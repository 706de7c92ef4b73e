//! Results produced by a pipeline run

use chrono::{DateTime, Duration, Utc};
use crew_llm::TokenUsage;
use serde::{Deserialize, Serialize};

/// Output of one completed task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Position of the task in the pipeline
    pub index: usize,
    /// Role of the agent that ran the task
    pub role: String,
    pub description: String,
    /// Raw answer text
    pub raw: String,
    pub usage: TokenUsage,
    pub iterations: usize,
    pub tool_calls: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl TaskOutput {
    /// Wall-clock time the task took
    pub fn duration(&self) -> Duration {
        self.finished_at - self.started_at
    }
}

/// Result of a successful pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// Output of the final task
    pub raw: String,
    /// Every task output in execution order
    pub tasks_output: Vec<TaskOutput>,
    /// Usage summed over every task
    pub token_usage: TokenUsage,
}

impl PipelineOutput {
    pub(crate) fn from_tasks(tasks_output: Vec<TaskOutput>) -> Self {
        let raw = tasks_output
            .last()
            .map(|t| t.raw.clone())
            .unwrap_or_default();
        let token_usage = tasks_output
            .iter()
            .fold(TokenUsage::default(), |acc, t| acc + t.usage);

        Self {
            raw,
            tasks_output,
            token_usage,
        }
    }

    /// Total wall-clock time from the first task start to the last task end
    pub fn duration(&self) -> Duration {
        match (self.tasks_output.first(), self.tasks_output.last()) {
            (Some(first), Some(last)) => last.finished_at - first.started_at,
            _ => Duration::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(index: usize, raw: &str, seconds: i64) -> TaskOutput {
        let started_at = DateTime::from_timestamp(1_700_000_000 + seconds, 0).unwrap();
        TaskOutput {
            index,
            role: format!("role {index}"),
            description: String::new(),
            raw: raw.to_string(),
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            },
            iterations: 1,
            tool_calls: 0,
            started_at,
            finished_at: started_at + Duration::seconds(2),
        }
    }

    #[test]
    fn test_from_tasks_takes_last_raw() {
        let result = PipelineOutput::from_tasks(vec![output(0, "A", 0), output(1, "B", 2)]);

        assert_eq!(result.raw, "B");
        assert_eq!(result.token_usage.total(), 30);
        assert_eq!(result.duration(), Duration::seconds(4));
        assert_eq!(result.tasks_output[0].duration(), Duration::seconds(2));
    }

    #[test]
    fn test_serializes_timestamps() {
        let json = serde_json::to_value(output(0, "A", 0)).unwrap();
        assert_eq!(json["started_at"], "2023-11-14T22:13:20Z");
        assert_eq!(json["usage"]["input_tokens"], 10);
    }
}
