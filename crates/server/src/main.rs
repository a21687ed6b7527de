use std::sync::Arc;

use anyhow::Context;
use db::DBService;
use server::{AppState, config::Config, routes};
use services::services::locale_registry::{LocaleRegistry, SqliteSettingsSource};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,server=debug,services=debug,db=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env()?;
    let db = DBService::new(&config.database_url)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;

    let registry = Arc::new(LocaleRegistry::new(
        Arc::new(SqliteSettingsSource::new(db.pool.clone())),
        config.fallback_locale.clone(),
        config.locale_retry,
    ));
    registry.ensure_loaded().await;

    let app = routes::router(AppState::new(db, registry), &config.cors_origins);
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    info!(addr = %listener.local_addr()?, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
