//! LLM client abstraction with tool use, and the Anthropic implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::metrics;

use super::config::LlmConfig;

/// Error type for LLM operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Not configured: {0}")]
    NotConfigured(String),
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmUsage {
    pub fn add(&mut self, other: LlmUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One block of message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }
}

/// A tool the model may call, described by a JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: Value,
}

/// Request for a completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolSpec>,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            system: None,
            messages,
            tools: Vec::new(),
            max_tokens: 1024,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Response from a completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Concatenated text blocks.
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    pub usage: LlmUsage,
    pub model: String,
}

impl CompletionResponse {
    /// Content blocks to append to the conversation as the assistant turn.
    pub fn to_message(&self) -> Message {
        let mut content = Vec::new();
        if !self.text.is_empty() {
            content.push(ContentBlock::Text {
                text: self.text.clone(),
            });
        }
        content.extend(self.tool_calls.iter().map(|call| ContentBlock::ToolUse {
            id: call.id.clone(),
            name: call.name.clone(),
            input: call.input.clone(),
        }));
        Message {
            role: Role::Assistant,
            content,
        }
    }
}

/// Trait for LLM clients.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider name (e.g., "anthropic")
    fn provider(&self) -> &str;

    fn model(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

// ============================================================================
// Anthropic Implementation
// ============================================================================

const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API client.
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
    timeout: Duration,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            api_base: ANTHROPIC_API_BASE.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Build a client from configuration; requires an API key.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::NotConfigured("ANTHROPIC_API_KEY is not set".to_string()))?;

        let mut client = Self::new(api_key, &config.model)
            .with_timeout(Duration::from_secs(config.timeout_secs as u64));
        if let Some(base) = &config.api_base {
            client = client.with_api_base(base.trim_end_matches('/'));
        }
        Ok(client)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolSpec],
}

fn no_tools(tools: &&[ToolSpec]) -> bool {
    tools.is_empty()
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    model: String,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContent {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

fn record_request(status: &str) {
    metrics::EXTERNAL_SERVICE_REQUESTS
        .with_label_values(&["anthropic", "messages", status])
        .inc();
}

#[async_trait]
impl LlmClient for AnthropicClient {
    fn provider(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            system: request.system.as_deref(),
            messages: &request.messages,
            tools: &request.tools,
        };

        debug!(
            model = %self.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(format!("{}/v1/messages", self.api_base))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                record_request("error");
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout)
                } else {
                    LlmError::Http(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status != 200 {
            record_request("error");
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            return Err(LlmError::Api { status, message });
        }
        record_request("success");

        let anthropic_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Json(e.to_string()))?;

        let mut text = String::new();
        let mut tool_calls = Vec::new();
        for block in anthropic_response.content {
            match block {
                AnthropicContent::Text { text: t } => text.push_str(&t),
                AnthropicContent::ToolUse { id, name, input } => {
                    tool_calls.push(ToolCall { id, name, input })
                }
                AnthropicContent::Other => {}
            }
        }

        let usage = LlmUsage {
            input_tokens: anthropic_response.usage.input_tokens,
            output_tokens: anthropic_response.usage.output_tokens,
        };
        metrics::LLM_TOKENS
            .with_label_values(&["anthropic", "input"])
            .inc_by(usage.input_tokens as u64);
        metrics::LLM_TOKENS
            .with_label_values(&["anthropic", "output"])
            .inc_by(usage.output_tokens as u64);

        Ok(CompletionResponse {
            text,
            tool_calls,
            usage,
            model: anthropic_response.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completion_request_builder() {
        let request = CompletionRequest::new(vec![Message::user_text("Hello")])
            .with_system("You are helpful")
            .with_max_tokens(100);

        assert_eq!(request.system, Some("You are helpful".to_string()));
        assert_eq!(request.max_tokens, 100);
        assert!(request.tools.is_empty());
    }

    #[test]
    fn test_tool_blocks_use_messages_api_shape() {
        let message = Message {
            role: Role::User,
            content: vec![ContentBlock::ToolResult {
                tool_use_id: "toolu_1".into(),
                content: "{}".into(),
                is_error: false,
            }],
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({"role": "user", "content": [{"type": "tool_result", "tool_use_id": "toolu_1", "content": "{}"}]})
        );
    }

    #[test]
    fn test_response_content_parsing() {
        let raw = json!({
            "content": [
                {"type": "text", "text": "Searching."},
                {"type": "tool_use", "id": "toolu_1", "name": "people_search", "input": {"limit": 5}},
                {"type": "thinking", "thinking": "..."}
            ],
            "model": "claude-test",
            "usage": {"input_tokens": 10, "output_tokens": 4}
        });
        let parsed: AnthropicResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.content.len(), 3);
        assert!(matches!(parsed.content[2], AnthropicContent::Other));
    }

    #[test]
    fn test_assistant_message_keeps_tool_calls() {
        let response = CompletionResponse {
            text: "Let me look.".into(),
            tool_calls: vec![ToolCall {
                id: "toolu_1".into(),
                name: "filter_builder".into(),
                input: json!({"filter_type": "title"}),
            }],
            usage: LlmUsage::default(),
            model: "m".into(),
        };
        let message = response.to_message();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.content.len(), 2);
    }

    #[test]
    fn test_from_config_requires_key() {
        let err = AnthropicClient::from_config(&LlmConfig::default()).err().unwrap();
        assert!(matches!(err, LlmError::NotConfigured(_)));

        let config = LlmConfig {
            api_key: Some("sk".into()),
            api_base: Some("http://localhost:9999/".into()),
            ..Default::default()
        };
        let client = AnthropicClient::from_config(&config).unwrap();
        assert_eq!(client.api_base, "http://localhost:9999");
        assert_eq!(client.provider(), "anthropic");
    }
}
