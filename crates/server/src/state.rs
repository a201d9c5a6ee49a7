use std::sync::Arc;

use recruiter_core::{
    BudgetLimits, Config, LlmClient, PeopleSearcher, SanitizedConfig, TodoClient,
};

/// Shared application state
pub struct AppState {
    config: Config,
    searcher: Option<Arc<dyn PeopleSearcher>>,
    llm: Option<Arc<dyn LlmClient>>,
    todo: TodoClient,
}

impl AppState {
    pub fn new(
        config: Config,
        searcher: Option<Arc<dyn PeopleSearcher>>,
        llm: Option<Arc<dyn LlmClient>>,
        todo: TodoClient,
    ) -> Self {
        Self {
            config,
            searcher,
            llm,
            todo,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn budget_limits(&self) -> &BudgetLimits {
        &self.config.budget
    }

    /// Search backend, `None` while no API key is configured.
    pub fn searcher(&self) -> Option<Arc<dyn PeopleSearcher>> {
        self.searcher.clone()
    }

    pub fn llm(&self) -> Option<Arc<dyn LlmClient>> {
        self.llm.clone()
    }

    pub fn todo(&self) -> &TodoClient {
        &self.todo
    }
}
