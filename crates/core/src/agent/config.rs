//! Agent configuration types.

use serde::{Deserialize, Serialize};

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    /// Anthropic Messages API.
    #[default]
    Anthropic,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Anthropic => "anthropic",
        }
    }
}

/// LLM client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    /// Model name/identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Usually supplied through `ANTHROPIC_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Custom API base URL (for proxies).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Maximum tokens per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Model turns per brief before the session gives up.
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
}

fn default_model() -> String {
    "claude-3-7-sonnet-20250219".to_string()
}

fn default_timeout() -> u32 {
    120
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_max_turns() -> u32 {
    12
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: default_model(),
            api_key: None,
            api_base: None,
            timeout_secs: default_timeout(),
            max_tokens: default_max_tokens(),
            max_turns: default_max_turns(),
        }
    }
}

impl LlmConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}
