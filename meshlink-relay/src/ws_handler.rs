use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use meshlink_core::BusEnvelope;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::RelayService;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(channel): Path<String>,
    State(service): State<RelayService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, channel, service))
}

async fn handle_socket(socket: WebSocket, channel: String, service: RelayService) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let id = service.subscribe(&channel, tx);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();
        let channel = channel.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => {
                        if let Err(e) = serde_json::from_str::<BusEnvelope>(text.as_str()) {
                            warn!("Dropping malformed frame on '{}': {}", channel, e);
                            continue;
                        }
                        let delivered = service.publish(&channel, text);
                        debug!("Relayed frame on '{}' to {} subscribers", channel, delivered);
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.unsubscribe(&channel, &id);
    info!("WebSocket on '{}' disconnected", channel);
}
