use crate::config::AppConfig;
use prefs_app::PreferenceService;
use prefs_contracts::AppResult;
use prefs_data::db;
use prefs_host_http::{AppState, run_server};
use prefs_logging::{init_logging, resolve_log_level, sanitize_path};

pub(crate) fn log_error_fallback(message: &str) {
    if tracing::dispatcher::has_been_set() {
        tracing::error!(event = "bootstrap_error", message = message);
        return;
    }

    eprintln!("{message}");
}

/// Brings the process up in order (logging, store, HTTP) and tears the store
/// down once the server has stopped.
pub(crate) async fn run(config: AppConfig) -> AppResult<()> {
    let level = resolve_log_level(config.log_level.as_deref());
    let _logging_guard = init_logging(&config.log_dir, &level)?;

    let store = db::open_store(&config.db_path).await?;
    db::init_store(&store).await?;
    tracing::info!(
        event = "store_ready",
        db_path = %sanitize_path(&config.db_path.display().to_string())
    );

    let state = AppState::new(PreferenceService::new(store.clone()))?;
    let served = run_server(&config.http, state).await;

    store.close();
    served
}
