pub mod agent;
pub mod budget;
pub mod config;
pub mod filter;
pub mod http;
pub mod metrics;
pub mod ranking;
pub mod searcher;
pub mod sourcing;
pub mod testing;
pub mod todo_api;

pub use agent::{
    AgentError, AgentOutcome, AgentSession, AnthropicClient, LlmClient, LlmConfig, LlmError,
    LlmProvider, ToolDispatcher, ToolError,
};
pub use budget::{BudgetController, BudgetError, BudgetLimits, RunBudget, RunPhase, StopReason};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, SanitizedConfig,
};
pub use filter::{FilterError, FilterNode, FilterRequest};
pub use http::{ApiClient, HttpError};
pub use ranking::{rank, RankingOutcome, Requirements};
pub use searcher::{
    CandidateProfile, PeopleDiscoveryClient, PeopleSearchOutput, PeopleSearcher, SearchError,
    SearchPage, SearchRequest,
};
pub use sourcing::{FilterVariant, RunReport, RunRequest, SourcingError, SourcingRun};
pub use todo_api::{Todo, TodoClient, TodoError};
