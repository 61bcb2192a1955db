mod bootstrap;
mod config;

use config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    if let Err(error) = bootstrap::run(config).await {
        bootstrap::log_error_fallback(&error.to_string());
        return Err(error.into());
    }
    Ok(())
}
