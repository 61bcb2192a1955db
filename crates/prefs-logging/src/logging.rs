use crate::{AppResult, ErrorContextExt, ResultExt};
use anyhow::Context;
use prefs_contracts::codes;
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder as RollingBuilder, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const DEFAULT_KEEP_DAYS: u64 = 7;
const LOG_FILE_PREFIX: &str = "prefs";
const LOG_FILE_SUFFIX: &str = "log";
const MAX_STRING_LEN: usize = 256;

/// Keeps the non-blocking file writer alive. Dropping it flushes and stops
/// file logging, so hold it for the lifetime of the process.
pub struct LoggingGuard {
    log_dir: PathBuf,
    level: String,
    _worker_guard: WorkerGuard,
}

impl std::fmt::Debug for LoggingGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingGuard")
            .field("log_dir", &self.log_dir)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn level(&self) -> &str {
        &self.level
    }
}

pub fn normalize_level(value: &str) -> Option<&'static str> {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Resolves the effective level, falling back to `debug` for debug builds and
/// `info` otherwise when the requested one is missing or unknown.
pub fn resolve_log_level(requested: Option<&str>) -> String {
    if let Some(level) = requested.and_then(normalize_level) {
        return level.to_string();
    }

    if cfg!(debug_assertions) {
        "debug".to_string()
    } else {
        "info".to_string()
    }
}

fn short_hash(value: &str) -> String {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

fn truncate_text(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }

    let mut truncated = String::new();
    for ch in value.chars() {
        if truncated.len() + ch.len_utf8() > max_len {
            break;
        }
        truncated.push(ch);
    }

    format!("{truncated}...(truncated,len={})", value.len())
}

fn looks_like_path(value: &str) -> bool {
    if value.starts_with("file://") || value.starts_with("~/") || value.starts_with('/') {
        return true;
    }

    value.contains(":\\") || value.contains('\\') || value.matches('/').count() >= 2
}

pub fn sanitize_path(value: &str) -> String {
    let normalized = value.trim().trim_matches('"').trim_matches('\'');
    let file_name = Path::new(normalized)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("unknown");

    format!("[path:{} dir_hash={}]", file_name, short_hash(normalized))
}

/// Makes a free-form value safe for structured log fields: paths are reduced
/// to their file name and long values are truncated.
pub fn sanitize_for_log(value: &str) -> String {
    let normalized = value.trim();
    if normalized.is_empty() {
        return String::new();
    }

    if looks_like_path(normalized) {
        return sanitize_path(normalized);
    }

    truncate_text(normalized, MAX_STRING_LEN)
}

fn cleanup_expired_logs_with_duration(
    log_dir: &Path,
    keep_duration: Duration,
    now: SystemTime,
) -> AppResult<usize> {
    if !log_dir.exists() {
        return Ok(0);
    }

    let entries = fs::read_dir(log_dir)
        .with_context(|| format!("failed to read log dir: {}", log_dir.display()))
        .with_code(codes::LOG_CLEANUP_FAILED, "Failed to read log directory")
        .with_ctx("logDir", log_dir.display().to_string())?;

    let mut removed = 0usize;
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read log entry: {}", log_dir.display()))
            .with_code(codes::LOG_CLEANUP_FAILED, "Failed to read log entry")?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let modified_at = entry
            .metadata()
            .and_then(|metadata| metadata.modified())
            .with_context(|| format!("failed to read log mtime: {}", path.display()))
            .with_code(codes::LOG_CLEANUP_FAILED, "Failed to read log metadata")
            .with_ctx("logPath", path.display().to_string())?;

        let elapsed = now.duration_since(modified_at).unwrap_or_default();
        if elapsed <= keep_duration {
            continue;
        }

        fs::remove_file(&path)
            .with_context(|| format!("failed to remove expired log: {}", path.display()))
            .with_code(codes::LOG_CLEANUP_FAILED, "Failed to remove expired log")
            .with_ctx("logPath", path.display().to_string())?;
        removed += 1;
    }

    Ok(removed)
}

pub fn cleanup_expired_logs(log_dir: &Path, keep_days: u64) -> AppResult<usize> {
    let keep_duration = Duration::from_secs(keep_days.saturating_mul(24 * 60 * 60));
    cleanup_expired_logs_with_duration(log_dir, keep_duration, SystemTime::now())
}

pub fn init_logging(log_dir: &Path, level: &str) -> AppResult<LoggingGuard> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log dir: {}", log_dir.display()))
        .with_code(codes::LOG_DIR_CREATE_FAILED, "Failed to create log directory")
        .with_ctx("logDir", log_dir.display().to_string())?;
    let removed = cleanup_expired_logs(log_dir, DEFAULT_KEEP_DAYS)?;

    let file_appender = RollingBuilder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(log_dir)
        .with_context(|| format!("failed to create log appender: {}", log_dir.display()))
        .with_code(codes::LOG_APPENDER_CREATE_FAILED, "Failed to create log appender")
        .with_ctx("logDir", log_dir.display().to_string())?;
    let (file_writer, worker_guard) = tracing_appender::non_blocking(file_appender);

    let level = resolve_log_level(Some(level));
    if !tracing::dispatcher::has_been_set() {
        let env_filter = EnvFilter::new(level.clone());
        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(file_writer)
            .with_current_span(false)
            .with_span_list(false);

        let subscriber = tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer);
        #[cfg(debug_assertions)]
        let subscriber = subscriber.with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_target(true),
        );

        subscriber
            .try_init()
            .with_context(|| format!("failed to install log subscriber: level={level}"))
            .with_code(
                codes::LOG_SUBSCRIBER_INIT_FAILED,
                "Failed to initialize log subscriber",
            )
            .with_ctx("logLevel", level.clone())?;
    }

    tracing::info!(
        event = "logging_initialized",
        level = level.as_str(),
        log_dir = %sanitize_path(&log_dir.display().to_string()),
        expired_removed = removed
    );

    Ok(LoggingGuard {
        log_dir: log_dir.to_path_buf(),
        level,
        _worker_guard: worker_guard,
    })
}

#[cfg(test)]
#[path = "../tests/infrastructure/logging_tests.rs"]
mod tests;
