use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use meshlink_core::{BusEnvelope, SignalMessage};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::error::{MeshError, Result};
use crate::signaling::SignalingOutput;

/// Topic subscription on a `meshlink-relay` server.
pub struct WsBus {
    outbound: mpsc::UnboundedSender<Message>,
    event_name: String,
}

impl WsBus {
    /// Subscribes to `channel` on the relay at `base_url` (`ws://host:port`).
    ///
    /// Returns the publisher and the stream of decoded `event_name` messages.
    pub async fn connect(
        base_url: &str,
        channel: &str,
        event_name: &str,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SignalMessage>)> {
        let url = format!("{}/channel/{}", base_url.trim_end_matches('/'), channel);
        let (socket, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
        info!("Subscribed to {}", url);

        let (mut sink, mut stream) = socket.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
        let (in_tx, in_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                if let Err(e) = sink.send(msg).await {
                    error!("Bus publish failed: {}", e);
                    break;
                }
            }
        });

        let event = event_name.to_owned();
        tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        let Some(msg) = decode_frame(&text, &event) else {
                            continue;
                        };
                        if in_tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Bus connection error: {}", e);
                        break;
                    }
                }
            }
            info!("Bus subscription ended");
        });

        Ok((
            Self {
                outbound: out_tx,
                event_name: event_name.to_owned(),
            },
            in_rx,
        ))
    }
}

#[async_trait]
impl SignalingOutput for WsBus {
    async fn publish(&self, msg: SignalMessage) -> Result<()> {
        let envelope = BusEnvelope::signal(&self.event_name, &msg)?;
        let json = serde_json::to_string(&envelope)?;
        self.outbound
            .send(Message::Text(json))
            .map_err(|_| MeshError::Bus("relay connection closed".to_owned()))
    }
}

fn decode_frame(text: &str, event_name: &str) -> Option<SignalMessage> {
    let envelope = match serde_json::from_str::<BusEnvelope>(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Ignoring malformed bus frame: {}", e);
            return None;
        }
    };

    match envelope.into_signal(event_name)? {
        Ok(msg) => Some(msg),
        Err(e) => {
            debug!("Ignoring undecodable signal payload: {}", e);
            None
        }
    }
}
