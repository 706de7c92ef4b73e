//! End-to-end behaviour of the sequential pipeline

use crew_core::{CONTEXT_SEPARATOR, Error};
use crew_llm::test_support::ScriptedProvider;
use crew_runtime::{Agent, Task};
use crew_workflow::{Pipeline, PipelineState};
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

const ROLES: [&str; 4] = [
    "Technical Analyst",
    "Fundamental Analyst",
    "Moderator",
    "Investment Analyst",
];

fn agent(role: &str, provider: &Arc<ScriptedProvider>) -> Arc<Agent> {
    Arc::new(
        Agent::builder(role)
            .goal(format!("Act as {role}"))
            .provider(Arc::clone(provider) as _)
            .model("test-model")
            .build()
            .unwrap(),
    )
}

/// Four agents, one provider each, one task per agent
fn crew(providers: &[Arc<ScriptedProvider>]) -> Pipeline {
    let agents: Vec<_> = ROLES
        .iter()
        .zip(providers)
        .map(|(role, provider)| agent(role, provider))
        .collect();

    let tasks = agents
        .iter()
        .enumerate()
        .map(|(i, a)| Task::new(format!("Task {i}"), "Text", Arc::clone(a)));

    Pipeline::builder()
        .agents(agents.iter().cloned())
        .tasks(tasks)
        .build()
}

#[tokio::test]
async fn final_output_is_last_task_and_context_accumulates_in_order() {
    let providers: Vec<_> = ["A", "B", "C", "D"]
        .iter()
        .map(|text| Arc::new(ScriptedProvider::text(*text, *text)))
        .collect();
    let mut pipeline = crew(&providers);

    let output = assert_ok!(pipeline.kickoff().await);

    assert_eq!(output.raw, "D");
    assert_eq!(pipeline.state(), PipelineState::Completed);
    let raws: Vec<_> = output.tasks_output.iter().map(|t| t.raw.as_str()).collect();
    assert_eq!(raws, ["A", "B", "C", "D"]);
    assert_eq!(output.tasks_output[3].role, "Investment Analyst");

    let last_prompt = providers[3].prompt_of(0).unwrap();
    let expected = ["A", "B", "C"].join(CONTEXT_SEPARATOR);
    assert!(last_prompt.contains(&expected));
}

#[tokio::test]
async fn each_task_sees_exactly_the_prior_outputs() {
    let providers: Vec<_> = ["A", "B", "C", "D"]
        .iter()
        .map(|text| Arc::new(ScriptedProvider::text(*text, format!("out-{text}"))))
        .collect();
    let mut pipeline = crew(&providers);

    assert_ok!(pipeline.kickoff().await);

    let first = providers[0].prompt_of(0).unwrap();
    assert!(!first.contains("context you're working with"));

    let outputs = ["out-A", "out-B", "out-C", "out-D"];
    for i in 1..providers.len() {
        let prompt = providers[i].prompt_of(0).unwrap();
        assert!(prompt.contains(&outputs[..i].join(CONTEXT_SEPARATOR)));
        for later in &outputs[i..] {
            assert!(!prompt.contains(later), "task {i} saw {later}");
        }
    }
}

#[tokio::test]
async fn failure_stops_the_pipeline_at_the_failing_task() {
    let providers = vec![
        Arc::new(ScriptedProvider::text("A", "A")),
        Arc::new(ScriptedProvider::failing("B", "quota exhausted")),
        Arc::new(ScriptedProvider::text("C", "C")),
        Arc::new(ScriptedProvider::text("D", "D")),
    ];
    let mut pipeline = crew(&providers);

    let err = assert_err!(pipeline.kickoff().await);

    assert_eq!(err.failed_index(), Some(1));
    assert!(err.is_capability());
    match &err {
        Error::TaskFailed { role, .. } => assert_eq!(role, "Fundamental Analyst"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(pipeline.state(), PipelineState::Failed { index: 1 });
    assert_eq!(providers[2].call_count(), 0);
    assert_eq!(providers[3].call_count(), 0);
}

#[tokio::test]
async fn empty_answer_does_not_abort_the_pipeline() {
    let providers = vec![
        Arc::new(ScriptedProvider::text("A", "A")),
        Arc::new(ScriptedProvider::text("B", "")),
        Arc::new(ScriptedProvider::text("C", "C")),
        Arc::new(ScriptedProvider::text("D", "D")),
    ];
    let mut pipeline = crew(&providers);

    let output = assert_ok!(pipeline.kickoff().await);

    assert_eq!(output.raw, "D");
    assert_eq!(output.tasks_output[1].raw, "");
    assert_eq!(pipeline.state(), PipelineState::Completed);
    assert_eq!(providers[3].call_count(), 1);
}

#[tokio::test]
async fn empty_agent_list_is_rejected_before_any_call() {
    let provider = Arc::new(ScriptedProvider::text("A", "A"));
    let analyst = agent("Technical Analyst", &provider);
    let mut pipeline = Pipeline::builder()
        .task(Task::new("Task", "", analyst))
        .build();

    let err = assert_err!(pipeline.kickoff().await);

    assert!(err.is_configuration());
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn empty_pipeline_is_rejected() {
    let mut pipeline = Pipeline::builder().build();
    let err = assert_err!(pipeline.kickoff().await);
    assert!(err.is_configuration());
}
