use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_base_url = parse_base_url(&require("PARTSCOUT_API_BASE_URL")?)?;
    let env = parse_environment(&or_default("PARTSCOUT_ENV", "development"));
    let log_level = or_default("PARTSCOUT_LOG_LEVEL", "info");
    let auth_token = lookup("PARTSCOUT_AUTH_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());

    let request_timeout_secs = parse_u64("PARTSCOUT_REQUEST_TIMEOUT_SECS", "30")?;
    let connect_timeout_secs = parse_u64("PARTSCOUT_CONNECT_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("PARTSCOUT_USER_AGENT", "partscout/0.1 (parts-search)");
    let default_currency = or_default("PARTSCOUT_DEFAULT_CURRENCY", "RUB");
    let stream_max_retries = parse_u32("PARTSCOUT_STREAM_MAX_RETRIES", "2")?;
    let stream_retry_backoff_base_secs =
        parse_u64("PARTSCOUT_STREAM_RETRY_BACKOFF_BASE_SECS", "1")?;

    Ok(AppConfig {
        api_base_url,
        env,
        log_level,
        auth_token,
        request_timeout_secs,
        connect_timeout_secs,
        user_agent,
        default_currency,
        stream_max_retries,
        stream_retry_backoff_base_secs,
    })
}

/// Validates the API base URL and strips any trailing slash so paths can be
/// appended with a plain `format!`.
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty());

    if !has_scheme || !has_host {
        return Err(ConfigError::InvalidEnvVar {
            var: "PARTSCOUT_API_BASE_URL".to_string(),
            reason: format!("\"{raw}\" is not an http(s) URL"),
        });
    }
    Ok(trimmed.to_string())
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
