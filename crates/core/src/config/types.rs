use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::agent::LlmConfig;
use crate::budget::BudgetLimits;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search_api: SearchApiConfig,
    #[serde(default)]
    pub budget: BudgetLimits,
    #[serde(default)]
    pub llm: Option<LlmConfig>,
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// People Discovery search API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchApiConfig {
    /// API base URL (e.g., "https://api.crustdata.com")
    #[serde(default = "default_search_base_url")]
    pub base_url: String,
    /// Bearer token. Searches are refused while this is unset.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u32,
    /// Fixed delay before the single retry, in milliseconds (default: 500)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for SearchApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_base_url(),
            api_key: None,
            timeout_secs: default_search_timeout(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl SearchApiConfig {
    /// Whether a credential is available for authenticated calls.
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

fn default_search_base_url() -> String {
    "https://api.crustdata.com".to_string()
}

fn default_search_timeout() -> u32 {
    10
}

fn default_retry_delay_ms() -> u64 {
    500
}

/// Demo data-integration endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DemoConfig {
    /// Todo API base URL
    #[serde(default = "default_todo_base_url")]
    pub todo_base_url: String,
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            todo_base_url: default_todo_base_url(),
            timeout_secs: default_search_timeout(),
        }
    }
}

fn default_todo_base_url() -> String {
    "https://jsonplaceholder.typicode.com".to_string()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub search_api: SanitizedSearchApiConfig,
    pub budget: BudgetLimits,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<SanitizedLlmConfig>,
    pub demo: DemoConfig,
}

/// Sanitized search API config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSearchApiConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
    pub retry_delay_ms: u64,
}

/// Sanitized LLM config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedLlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key_configured: bool,
    pub max_turns: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            search_api: SanitizedSearchApiConfig {
                base_url: config.search_api.base_url.clone(),
                api_key_configured: config.search_api.is_configured(),
                timeout_secs: config.search_api.timeout_secs,
                retry_delay_ms: config.search_api.retry_delay_ms,
            },
            budget: config.budget.clone(),
            llm: config.llm.as_ref().map(|l| SanitizedLlmConfig {
                provider: l.provider.as_str().to_string(),
                model: l.model.clone(),
                api_key_configured: l.api_key.as_deref().is_some_and(|k| !k.is_empty()),
                max_turns: l.max_turns,
            }),
            demo: config.demo.clone(),
        }
    }
}
