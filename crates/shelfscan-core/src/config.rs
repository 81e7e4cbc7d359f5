use std::path::PathBuf;

use thiserror::Error;

use crate::app_config::{AppConfig, FetchStrategy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but its value is invalid.
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
/// Returns `ConfigError` if a variable is present but its value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// config. Tests pass a `HashMap` lookup instead of touching process env.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("SHELFSCAN_LOG_LEVEL", "info");
    let fetch_strategy = parse_fetch_strategy(&or_default("SHELFSCAN_FETCH_STRATEGY", "stealth"))?;

    let request_timeout_secs = parse_u64("SHELFSCAN_REQUEST_TIMEOUT_SECS", "20")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHELFSCAN_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }

    let user_agent = or_default("SHELFSCAN_USER_AGENT", "shelfscan/0.1 (catalog-export)");
    let min_delay_ms = parse_u64("SHELFSCAN_MIN_DELAY_MS", "1000")?;
    let max_delay_ms = parse_u64("SHELFSCAN_MAX_DELAY_MS", "2000")?;
    let output_dir = PathBuf::from(or_default("SHELFSCAN_OUTPUT_DIR", "."));
    let chrome_path = lookup("SHELFSCAN_CHROME_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        log_level,
        fetch_strategy,
        request_timeout_secs,
        user_agent,
        min_delay_ms,
        max_delay_ms,
        output_dir,
        chrome_path,
    })
}

fn parse_fetch_strategy(s: &str) -> Result<FetchStrategy, ConfigError> {
    s.parse::<FetchStrategy>()
        .map_err(|reason| ConfigError::InvalidEnvVar {
            var: "SHELFSCAN_FETCH_STRATEGY".to_string(),
            reason,
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
