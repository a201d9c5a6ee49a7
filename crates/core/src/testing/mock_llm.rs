//! Scripted LLM client for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::agent::{
    CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage, ToolCall,
};

/// Mock implementation of the [`LlmClient`] trait.
///
/// Responses are returned in the order they were pushed. Once the script
/// runs out, every call answers with a plain "Done.".
pub struct MockLlmClient {
    responses: Arc<RwLock<VecDeque<CompletionResponse>>>,
    requests: Arc<RwLock<Vec<CompletionRequest>>>,
    next_error: Arc<RwLock<Option<LlmError>>>,
}

impl std::fmt::Debug for MockLlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLlmClient")
            .field("responses", &"<responses>")
            .field("requests", &"<requests>")
            .field("next_error", &"<next_error>")
            .finish()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

fn response(text: &str, tool_calls: Vec<ToolCall>) -> CompletionResponse {
    CompletionResponse {
        text: text.to_string(),
        tool_calls,
        usage: LlmUsage {
            input_tokens: 100,
            output_tokens: 20,
        },
        model: "mock-model".to_string(),
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(VecDeque::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Queue a final text answer.
    pub async fn push_text(&self, text: &str) {
        self.responses.write().await.push_back(response(text, Vec::new()));
    }

    /// Queue a turn that requests tool calls.
    pub async fn push_tool_calls(&self, calls: Vec<ToolCall>) {
        self.responses.write().await.push_back(response("", calls));
    }

    /// Configure the next completion to fail with the given error.
    pub async fn set_next_error(&self, error: LlmError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        self.requests.write().await.push(request);
        Ok(self
            .responses
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| response("Done.", Vec::new())))
    }
}
