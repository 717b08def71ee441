//! HTTP server bootstrap

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::settings::ServerConfig;

/// Bind and serve `app` until Ctrl-C
pub async fn serve(app: Router, config: &ServerConfig, service: &str) -> Result<()> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("{} listening on {}", service, address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("{} stopped", service);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
