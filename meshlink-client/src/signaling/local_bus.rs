use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use meshlink_core::SignalMessage;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::signaling::SignalingOutput;

struct LocalBusInner {
    subscribers: DashMap<Uuid, mpsc::UnboundedSender<SignalMessage>>,
}

/// In-process topic. Every clone publishes to the same set of subscribers.
#[derive(Clone)]
pub struct LocalBus {
    inner: Arc<LocalBusInner>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(LocalBusInner {
                subscribers: DashMap::new(),
            }),
        }
    }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SignalMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.subscribers.insert(Uuid::new_v4(), tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalingOutput for LocalBus {
    async fn publish(&self, msg: SignalMessage) -> Result<()> {
        let mut gone = Vec::new();
        for entry in self.inner.subscribers.iter() {
            if entry.value().send(msg.clone()).is_err() {
                gone.push(*entry.key());
            }
        }

        for id in gone {
            debug!("Dropping closed local bus subscriber {}", id);
            self.inner.subscribers.remove(&id);
        }
        Ok(())
    }
}
