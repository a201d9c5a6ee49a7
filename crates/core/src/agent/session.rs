//! Tool-call loop of one sourcing brief.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::llm::{
    CompletionRequest, ContentBlock, LlmClient, LlmError, LlmUsage, Message, Role, ToolSpec,
};
use super::prompts::{brief_message, SYSTEM_PROMPT};
use super::tools::{tool_specs, ToolDispatcher};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Brief is empty")]
    EmptyBrief,

    #[error("No final answer after {0} model turns")]
    TurnLimit(u32),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// A tool call made during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    pub is_error: bool,
}

/// Result of a completed session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentOutcome {
    /// Final text answer of the model.
    pub reply: String,
    pub turns: u32,
    pub tool_calls: Vec<ToolInvocation>,
    pub usage: LlmUsage,
    pub model: String,
}

/// Runs a brief through the model, executing tool calls until it answers.
pub struct AgentSession {
    llm: Arc<dyn LlmClient>,
    tools: ToolDispatcher,
    specs: Vec<ToolSpec>,
    max_turns: u32,
    max_tokens: u32,
}

impl AgentSession {
    pub fn new(llm: Arc<dyn LlmClient>, tools: ToolDispatcher) -> Self {
        Self {
            llm,
            tools,
            specs: tool_specs(),
            max_turns: 12,
            max_tokens: 4096,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub async fn run(&self, brief: &str) -> Result<AgentOutcome, AgentError> {
        if brief.trim().is_empty() {
            return Err(AgentError::EmptyBrief);
        }

        info!(
            provider = self.llm.provider(),
            model = self.llm.model(),
            max_turns = self.max_turns,
            "Starting agent session"
        );

        let mut messages = vec![Message::user_text(brief_message(brief))];
        let mut usage = LlmUsage::default();
        let mut invocations = Vec::new();

        for turn in 1..=self.max_turns {
            let request = CompletionRequest::new(messages.clone())
                .with_system(SYSTEM_PROMPT)
                .with_tools(self.specs.clone())
                .with_max_tokens(self.max_tokens);

            let response = self.llm.complete(request).await?;
            usage.add(response.usage);

            if response.tool_calls.is_empty() {
                info!(turns = turn, tool_calls = invocations.len(), "Agent session finished");
                return Ok(AgentOutcome {
                    reply: response.text,
                    turns: turn,
                    tool_calls: invocations,
                    usage,
                    model: response.model,
                });
            }

            messages.push(response.to_message());

            let mut results = Vec::with_capacity(response.tool_calls.len());
            for call in response.tool_calls {
                debug!(turn, tool = %call.name, "Model requested tool");
                let (content, is_error) = self.tools.dispatch(&call.name, call.input).await;
                invocations.push(ToolInvocation {
                    name: call.name,
                    is_error,
                });
                results.push(ContentBlock::ToolResult {
                    tool_use_id: call.id,
                    content,
                    is_error,
                });
            }
            messages.push(Message {
                role: Role::User,
                content: results,
            });
        }

        warn!(max_turns = self.max_turns, "Agent session hit its turn limit");
        Err(AgentError::TurnLimit(self.max_turns))
    }
}
