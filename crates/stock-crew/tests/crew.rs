//! End-to-end crew runs against scripted providers

use async_trait::async_trait;
use crew_core::CONTEXT_SEPARATOR;
use crew_llm::{LLMProvider, ProviderRegistry};
use crew_llm::test_support::ScriptedProvider;
use crew_notify::{DeliveryError, DeliveryResult, Notify};
use crew_tools::Tool;
use crew_workflow::PipelineState;
use mockall::mock;
use serde_json::{Value, json};
use std::sync::Arc;
use stock_crew::{
    CrewConfig, Delivery, ProviderKind, ResponseLanguage, RoleProviders, assemble_pipeline,
    run_and_deliver,
};
use tokio_test::{assert_err, assert_ok};

mock! {
    pub Notifier {}

    #[async_trait]
    impl Notify for Notifier {
        async fn deliver(&self, destination: &str, body: &str) -> DeliveryResult;
    }
}

mock! {
    pub Search {}

    #[async_trait]
    impl Tool for Search {
        async fn execute(&self, params: Value) -> crew_core::Result<Value>;
        fn name(&self) -> &str;
        fn description(&self) -> &str;
        fn input_schema(&self) -> Value;
    }
}

const DESTINATION: &str = "5511999999999";

fn config() -> CrewConfig {
    CrewConfig::builder()
        .google_api_key("g")
        .groq_api_key("q")
        .language(ResponseLanguage::Portuguese)
        .providers(RoleProviders::all(ProviderKind::Gemini))
        .build()
        .unwrap()
}

fn search(expected_calls: usize) -> Arc<dyn Tool> {
    let mut tool = MockSearch::new();
    tool.expect_name().return_const("duckduckgo_search".to_string());
    tool.expect_description().return_const("Search the web".to_string());
    tool.expect_input_schema()
        .returning(|| json!({"type": "object", "properties": {"query": {"type": "string"}}}));
    tool.expect_execute()
        .times(expected_calls)
        .returning(|_| Ok(json!("PETR4 sobe 3% na B3")));
    Arc::new(tool)
}

fn registry(provider: &Arc<ScriptedProvider>) -> ProviderRegistry {
    let gemini: Arc<dyn LLMProvider> = provider.clone();
    ProviderRegistry::new()
        .with("gemini", gemini)
        .with("groq", Arc::new(ScriptedProvider::new("groq")))
}

#[tokio::test]
async fn report_is_the_last_answer_and_is_delivered_once() {
    let provider = Arc::new(
        ScriptedProvider::new("gemini")
            .then_tool_use("s1", "duckduckgo_search", json!({"query": "ações B3 liquidez"}))
            .then_text("A")
            .then_text("B")
            .then_text("C")
            .then_text("D"),
    );
    let mut pipeline = assemble_pipeline(&config(), &registry(&provider), search(1)).unwrap();

    let mut notifier = MockNotifier::new();
    notifier
        .expect_deliver()
        .withf(|destination, body| destination == DESTINATION && body == "D")
        .times(1)
        .returning(|_, _| DeliveryResult::delivered(200));

    let report = assert_ok!(
        run_and_deliver(
            &mut pipeline,
            Some(Delivery {
                notifier: &notifier,
                destination: DESTINATION,
            }),
        )
        .await
    );

    assert_eq!(report.report(), "D");
    assert_eq!(report.delivery, Some(DeliveryResult::delivered(200)));
    assert_eq!(report.output.tasks_output[0].tool_calls, 1);

    // search call plus one call per task
    assert_eq!(provider.call_count(), 5);
    let investment_prompt = provider.prompt_of(4).unwrap();
    assert!(investment_prompt.contains(&["A", "B", "C"].join(CONTEXT_SEPARATOR)));
    assert!(investment_prompt.contains("relatório detalhado"));
}

#[tokio::test]
async fn failed_task_sends_nothing() {
    let provider = Arc::new(
        ScriptedProvider::new("gemini")
            .then_text("A")
            .then_fail("quota exceeded"),
    );
    let mut pipeline = assemble_pipeline(&config(), &registry(&provider), search(0)).unwrap();

    let mut notifier = MockNotifier::new();
    notifier.expect_deliver().never();

    let err = assert_err!(
        run_and_deliver(
            &mut pipeline,
            Some(Delivery {
                notifier: &notifier,
                destination: DESTINATION,
            }),
        )
        .await
    );

    assert!(!err.is_configuration());
    assert_eq!(err.exit_code(), stock_crew::EXIT_PIPELINE);
    assert!(err.to_string().contains("Task 1 (Analista Fundamentalista)"));
    assert_eq!(pipeline.state(), PipelineState::Failed { index: 1 });
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn delivery_failure_does_not_fail_the_run() {
    let provider = Arc::new(
        ScriptedProvider::new("gemini")
            .then_text("A")
            .then_text("B")
            .then_text("C")
            .then_text("D"),
    );
    let mut pipeline = assemble_pipeline(&config(), &registry(&provider), search(0)).unwrap();

    let mut notifier = MockNotifier::new();
    notifier.expect_deliver().times(1).returning(|_, _| {
        DeliveryResult::failed(DeliveryError::Status {
            status: 401,
            body: "invalid token".to_string(),
        })
    });

    let report = assert_ok!(
        run_and_deliver(
            &mut pipeline,
            Some(Delivery {
                notifier: &notifier,
                destination: DESTINATION,
            }),
        )
        .await
    );

    let delivery = report.delivery.unwrap();
    assert!(!delivery.success);
    assert_eq!(delivery.status, Some(401));
}

#[tokio::test]
async fn dry_run_skips_delivery() {
    let provider = Arc::new(
        ScriptedProvider::new("gemini")
            .then_text("A")
            .then_text("B")
            .then_text("C")
            .then_text("D"),
    );
    let mut pipeline = assemble_pipeline(&config(), &registry(&provider), search(0)).unwrap();

    let report = assert_ok!(run_and_deliver(&mut pipeline, None).await);
    assert_eq!(report.report(), "D");
    assert!(report.delivery.is_none());
}
