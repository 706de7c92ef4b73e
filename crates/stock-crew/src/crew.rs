//! Assembly of the four-agent crew

use crate::config::{CrewConfig, ProviderKind};
use crate::error::Result;
use crate::prompts::CrewRole;
use crew_llm::ProviderRegistry;
use crew_llm::providers::{GeminiProvider, GroqProvider};
use crew_runtime::{Agent, Task};
use crew_tools::Tool;
use crew_workflow::{Pipeline, Process};
use std::sync::Arc;
use tracing::{debug, info};

/// Register a client for every supported provider
///
/// Both credentials are required even when no role uses Groq.
pub fn provider_registry(config: &CrewConfig) -> Result<ProviderRegistry> {
    let gemini = GeminiProvider::new(config.google_api_key.clone())?;
    let groq = GroqProvider::new(config.groq_api_key.clone())?;

    Ok(ProviderRegistry::new()
        .with(ProviderKind::Gemini.id(), Arc::new(gemini))
        .with(ProviderKind::Groq.id(), Arc::new(groq)))
}

/// Build the agent for one role
pub fn build_agent(
    role: CrewRole,
    config: &CrewConfig,
    registry: &ProviderRegistry,
    search: &Arc<dyn Tool>,
) -> Result<Agent> {
    let kind = config.providers.for_role(role);
    let provider = registry.resolve(kind.id())?;
    let persona = role.persona(config.language);

    let mut builder = Agent::builder(persona.role)
        .goal(persona.goal)
        .backstory(persona.backstory)
        .provider(provider)
        .model(config.model_for(kind))
        .temperature(config.temperature)
        .allow_delegation(role.allows_delegation())
        .verbose(config.verbose);
    if role.uses_search() {
        builder = builder.tool(Arc::clone(search));
    }

    let agent = builder.build()?;
    debug!(
        role = agent.role(),
        provider = %kind,
        model = agent.model(),
        tools = ?agent.tools().names(),
        "Agent ready"
    );
    Ok(agent)
}

/// Build the sequential pipeline: technical → fundamental → moderator → investment
pub fn assemble_pipeline(
    config: &CrewConfig,
    registry: &ProviderRegistry,
    search: Arc<dyn Tool>,
) -> Result<Pipeline> {
    let mut agents = Vec::with_capacity(CrewRole::ALL.len());
    let mut tasks = Vec::with_capacity(CrewRole::ALL.len());

    for role in CrewRole::ALL {
        let agent = Arc::new(build_agent(role, config, registry, &search)?);
        let brief = role.brief(config.language);
        tasks.push(Task::new(
            brief.description,
            brief.expected_output,
            Arc::clone(&agent),
        ));
        agents.push(agent);
    }

    info!(
        language = %config.language,
        agents = agents.len(),
        "Crew assembled"
    );

    Ok(Pipeline::builder()
        .agents(agents)
        .tasks(tasks)
        .process(Process::Sequential)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ResponseLanguage, RoleProviders};
    use crew_llm::test_support::ScriptedProvider;
    use crew_tools::DuckDuckGoSearch;

    fn config(language: ResponseLanguage) -> CrewConfig {
        CrewConfig::builder()
            .google_api_key("g")
            .groq_api_key("q")
            .language(language)
            .providers(RoleProviders {
                moderator: ProviderKind::Groq,
                ..RoleProviders::default()
            })
            .build()
            .unwrap()
    }

    fn search() -> Arc<dyn Tool> {
        Arc::new(DuckDuckGoSearch::new().unwrap())
    }

    #[test]
    fn test_real_registry_has_both_providers() {
        let registry = provider_registry(&config(ResponseLanguage::Portuguese)).unwrap();
        assert_eq!(registry.ids(), vec!["gemini", "groq"]);
    }

    #[test]
    fn test_pipeline_layout() {
        let registry = ProviderRegistry::new()
            .with("gemini", Arc::new(ScriptedProvider::new("gemini")))
            .with("groq", Arc::new(ScriptedProvider::new("groq")));

        let pipeline =
            assemble_pipeline(&config(ResponseLanguage::English), &registry, search()).unwrap();

        let roles: Vec<_> = pipeline.agents().iter().map(|a| a.role()).collect();
        assert_eq!(
            roles,
            ["Technical Analyst", "Fundamental Analyst", "Moderator", "Investment Analyst"]
        );
        assert_eq!(pipeline.tasks().len(), 4);
        assert_eq!(pipeline.process(), Process::Sequential);

        let agents = pipeline.agents();
        assert_eq!(agents[0].tools().names(), vec!["duckduckgo_search"]);
        assert!(agents[0].allow_delegation());
        assert!(agents[2].tools().is_empty());
        assert!(!agents[3].allow_delegation());
        assert_eq!(agents[0].model(), "gemini-pro");
        assert_eq!(agents[2].model(), "llama3-70b-8192");
        assert_eq!(agents[2].provider().name(), "groq");

        for (task, agent) in pipeline.tasks().iter().zip(agents) {
            assert!(Arc::ptr_eq(task.agent(), agent));
        }
    }

    #[test]
    fn test_unregistered_provider_is_configuration_error() {
        let registry =
            ProviderRegistry::new().with("gemini", Arc::new(ScriptedProvider::new("gemini")));

        let err = assemble_pipeline(&config(ResponseLanguage::Portuguese), &registry, search())
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("groq"));
    }
}
