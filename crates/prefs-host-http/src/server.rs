use crate::routes::configure_routes;
use crate::state::AppState;
use actix_web::{App, HttpServer, web};
use prefs_contracts::{AppResult, ErrorContextExt, ResultExt, codes};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    /// Worker count; `None` keeps the actix default of one per physical core.
    pub workers: Option<usize>,
}

impl HttpConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Serves until the process receives SIGINT/SIGTERM, then drains in-flight
/// requests and returns.
pub async fn run_server(config: &HttpConfig, state: AppState) -> AppResult<()> {
    let data = web::Data::new(state);
    let mut server =
        HttpServer::new(move || App::new().app_data(data.clone()).configure(configure_routes));
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    let server = server
        .bind((config.host.as_str(), config.port))
        .with_code(codes::HTTP_BIND_FAILED, "Failed to bind HTTP listener")
        .with_ctx("bindAddress", config.bind_address())?;

    tracing::info!(
        event = "http_server_started",
        bind_address = config.bind_address().as_str(),
        workers = config.workers.unwrap_or_default()
    );

    server
        .run()
        .await
        .with_code(codes::HTTP_SERVER_FAILED, "HTTP server terminated with an error")?;

    tracing::info!(event = "http_server_stopped");
    Ok(())
}
