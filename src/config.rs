use prefs_contracts::{AppError, AppResult, codes};
use prefs_host_http::HttpConfig;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "PREFS_DB_PATH";
pub const ENV_HOST: &str = "PREFS_HOST";
pub const ENV_PORT: &str = "PREFS_PORT";
pub const ENV_LOG_LEVEL: &str = "PREFS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PREFS_LOG_DIR";
pub const ENV_WORKERS: &str = "PREFS_WORKERS";

const DEFAULT_DB_PATH: &str = "prefs.db";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_LOG_DIR: &str = "logs";

/// Startup settings, resolved once from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    /// Requested level; `None` lets the logging layer pick the build default.
    pub log_level: Option<String>,
    pub http: HttpConfig,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match read(ENV_PORT) {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };
        let workers = match read(ENV_WORKERS) {
            Some(raw) => Some(parse_workers(&raw)?),
            None => None,
        };

        Ok(Self {
            db_path: PathBuf::from(read(ENV_DB_PATH).unwrap_or_else(|| DEFAULT_DB_PATH.into())),
            log_dir: PathBuf::from(read(ENV_LOG_DIR).unwrap_or_else(|| DEFAULT_LOG_DIR.into())),
            log_level: read(ENV_LOG_LEVEL),
            http: HttpConfig {
                host: read(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
                workers,
            },
        })
    }
}

fn invalid(key: &str, raw: &str, reason: &str) -> AppError {
    AppError::new(codes::CONFIG_INVALID, "Invalid configuration value")
        .with_context("key", key)
        .with_context("value", raw)
        .with_cause(reason)
}

fn parse_port(raw: &str) -> AppResult<u16> {
    raw.parse::<u16>()
        .map_err(|error| invalid(ENV_PORT, raw, &error.to_string()))
}

fn parse_workers(raw: &str) -> AppResult<usize> {
    match raw.parse::<usize>() {
        Ok(0) => Err(invalid(ENV_WORKERS, raw, "worker count must be positive")),
        Ok(value) => Ok(value),
        Err(error) => Err(invalid(ENV_WORKERS, raw, &error.to_string())),
    }
}

#[cfg(test)]
#[path = "../tests/core/config_tests.rs"]
mod tests;
