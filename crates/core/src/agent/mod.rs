//! LLM-driven sourcing agent.
//!
//! An [`AgentSession`] hands a recruitment brief to an [`LlmClient`] along
//! with the tool catalogue (`people_search`, `filter_builder`,
//! `candidate_ranker`) and executes the tool calls the model makes until it
//! returns a final answer.

mod config;
mod llm;
mod prompts;
mod session;
mod tools;

pub use config::{LlmConfig, LlmProvider};
pub use llm::{
    AnthropicClient, CompletionRequest, CompletionResponse, ContentBlock, LlmClient, LlmError,
    LlmUsage, Message, Role, ToolCall, ToolSpec,
};
pub use prompts::{brief_message, SYSTEM_PROMPT};
pub use session::{AgentError, AgentOutcome, AgentSession, ToolInvocation};
pub use tools::{
    build_filter, rank_candidates, tool_specs, ToolDispatcher, ToolError, CANDIDATE_RANKER,
    FILTER_BUILDER, PEOPLE_SEARCH,
};
