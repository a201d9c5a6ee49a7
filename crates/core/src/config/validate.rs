use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Search API base URL is an http(s) URL
/// - Budget limits are internally consistent
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let base_url = config.search_api.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "search_api.base_url must be an http(s) URL, got '{}'",
            base_url
        )));
    }

    if config.search_api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "search_api.timeout_secs cannot be 0".to_string(),
        ));
    }

    config
        .budget
        .validate()
        .map_err(|e| ConfigError::ValidationError(format!("budget: {}", e)))?;

    if let Some(llm) = &config.llm {
        if llm.max_turns == 0 {
            return Err(ConfigError::ValidationError(
                "llm.max_turns cannot be 0".to_string(),
            ));
        }
    }

    Ok(())
}
