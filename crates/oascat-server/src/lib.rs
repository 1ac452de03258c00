//! HTTP surface over an oascat [`Registry`](oascat_core::Registry).

mod catalog;
mod error;
mod router;
mod specs;

#[cfg(test)]
mod tests;

use std::io;
use std::sync::Arc;

use oascat_core::Registry;
use oascat_core::config::ServerConfig;

pub use error::ApiError;
pub use router::{AppState, create_router};

/// Bind `config.host:config.port` and serve until Ctrl-C.
pub async fn serve(registry: Arc<Registry>, config: &ServerConfig) -> io::Result<()> {
    let state = AppState::new(registry, config.public_url());
    let app = create_router(state, config.cors);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    log::info!("serving OpenAPI catalog on http://{}", listener.local_addr()?);
    log::info!("public catalog URL: {}", config.public_url());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for Ctrl-C: {e}");
        return;
    }
    log::info!("shutting down");
}
