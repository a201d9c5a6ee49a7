use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment prefix for nested overrides, e.g. `RECRUITER_BUDGET__MAX_PAGES=4`.
pub const ENV_PREFIX: &str = "RECRUITER_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(Figment::new().merge(Toml::file(path)))
}

/// Load configuration from defaults and environment variables only
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    extract(Figment::new())
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(credential_env("CRUSTDATA_API_BASE_URL", "search_api.base_url"))
        .merge(credential_env("CRUSTDATA_API_KEY", "search_api.api_key"))
        .merge(credential_env("ANTHROPIC_API_KEY", "llm.api_key"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Map a conventional, unprefixed variable onto a config key path.
fn credential_env(var: &'static str, key: &'static str) -> Env {
    Env::raw().only(&[var]).map(move |_| key.into())
}
