//! Topic fan-out server standing in for a managed publish/subscribe bus.

mod config;
mod error;
mod relay_service;
mod ws_handler;

pub use config::*;
pub use error::*;
pub use relay_service::*;
pub use ws_handler::*;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::info;

pub fn router(service: RelayService) -> Router {
    Router::new()
        .route("/channel/{name}", get(ws_handler))
        .route("/health", get(|| async { "ok" }))
        .with_state(service)
}

/// Binds `config.addr` and serves until the listener fails.
pub async fn serve(config: RelayConfig) -> Result<(), RelayError> {
    let listener = TcpListener::bind(&config.addr)
        .await
        .map_err(|source| RelayError::Bind {
            addr: config.addr.clone(),
            source,
        })?;
    info!("Relay listening on {}", config.addr);

    axum::serve(listener, router(RelayService::new())).await?;
    Ok(())
}
