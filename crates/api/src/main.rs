use std::sync::Arc;

use anyhow::Context;

use holocron_infra::{AppConfig, SqlStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    holocron_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let store = SqlStore::connect(&config.database_url, config.max_connections)
        .await
        .context("failed to open database")?;

    let app = holocron_api::app::build_app(Arc::new(store));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
