use async_trait::async_trait;
use meshlink_core::SignalMessage;
use tracing::error;

use crate::error::Result;

/// Publishing side of the message bus.
///
/// A publish is delivered to every subscriber of the topic, the publisher
/// included; receivers filter their own echoes.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn publish(&self, msg: SignalMessage) -> Result<()>;
}

/// Publishes `msg`, logging instead of propagating a bus failure.
pub async fn publish_logged(output: &dyn SignalingOutput, msg: SignalMessage) {
    let kind = msg.kind();
    if let Err(e) = output.publish(msg).await {
        error!("Failed to publish {} message: {}", kind, e);
    }
}
