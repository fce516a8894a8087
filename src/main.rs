use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;

use fabrika_api as api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = api::config::load_config().context("failed to load configuration")?;
    api::config::init_tracing(config.log_level(), config.log_json);

    let db = api::db::establish_connection_from_app_config(&config).await?;
    if config.auto_migrate {
        api::db::run_migrations(&db).await?;
    }

    std::fs::create_dir_all(&config.documents_dir)
        .with_context(|| format!("failed to create {}", config.documents_dir))?;
    std::fs::create_dir_all(&config.uploads_dir)
        .with_context(|| format!("failed to create {}", config.uploads_dir))?;

    let state = api::AppState::new(Arc::new(db), config.clone());
    let app = api::app_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown signal received");
}
