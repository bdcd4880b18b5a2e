use std::str::FromStr;

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
/// Parsing and validation are decoupled from the process environment so they
/// can be tested with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("REPOLENS_ENV", "development"))?;

    let bind_addr: SocketAddr = parse_var(&lookup, "REPOLENS_BIND_ADDR", "0.0.0.0:8080")?;
    let log_level = or_default("REPOLENS_LOG_LEVEL", "info");
    let cors_origin = or_default("REPOLENS_CORS_ORIGIN", "http://localhost:5173");

    let github_api_url = or_default("GITHUB_API_URL", "https://api.github.com");
    let github_token = optional("GITHUB_TOKEN");
    let ollama_url = or_default("OLLAMA_URL", "http://localhost:11435/api");
    let ollama_model = or_default("OLLAMA_MODEL", "llama3");
    let comfyui_url = or_default("COMFYUI_URL", "http://localhost:8189");
    let comfyui_workflow_path = PathBuf::from(or_default(
        "COMFYUI_WORKFLOW_PATH",
        "./config/github-profile-workflow.json",
    ));

    let ingest_cron = or_default("REPOLENS_INGEST_CRON", "0 * * * * *");
    let retention_cron = or_default("REPOLENS_RETENTION_CRON", "0 0 0 * * *");
    let retention_days: i64 = parse_var(&lookup, "REPOLENS_RETENTION_DAYS", "30")?;
    if retention_days <= 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "REPOLENS_RETENTION_DAYS".to_string(),
            reason: format!("must be a positive number of days, got {retention_days}"),
        });
    }
    let http_timeout_secs: u64 = parse_var(&lookup, "REPOLENS_HTTP_TIMEOUT_SECS", "30")?;

    let db_max_connections: u32 = parse_var(&lookup, "REPOLENS_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections: u32 = parse_var(&lookup, "REPOLENS_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs: u64 =
        parse_var(&lookup, "REPOLENS_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        cors_origin,
        github_api_url,
        github_token,
        ollama_url,
        ollama_model,
        comfyui_url,
        comfyui_workflow_path,
        ingest_cron,
        retention_cron,
        retention_days,
        http_timeout_secs,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Read `var` (or `default` when unset) and parse it into `T`.
fn parse_var<F, T>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "REPOLENS_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
