//! Integration tests for meshlink_relay over real sockets.


use std::net::SocketAddr;
use std::time::Duration;

use meshlink_relay::{RelayService, router};
use tokio::net::TcpListener;
use tracing::Level;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Serve a relay on an ephemeral port. Returns its address and the service
/// so tests can observe the topic table.
pub async fn start_relay() -> anyhow::Result<(SocketAddr, RelayService)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let service = RelayService::new();

    let app = router(service.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((addr, service))
}

/// Wait until `channel` has `count` subscribers.
pub async fn wait_for_subscribers(service: &RelayService, channel: &str, count: usize) -> bool {
    for _ in 0..200 {
        if service.subscriber_count(channel) == count {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
