use std::sync::Arc;

use axum::extract::ws::{Message, Utf8Bytes};
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

type Subscribers = DashMap<Uuid, mpsc::UnboundedSender<Message>>;

struct RelayInner {
    channels: DashMap<String, Subscribers>,
}

/// Topic table shared by every WebSocket connection.
#[derive(Clone)]
pub struct RelayService {
    inner: Arc<RelayInner>,
}

impl RelayService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RelayInner {
                channels: DashMap::new(),
            }),
        }
    }

    pub fn subscribe(&self, channel: &str, tx: mpsc::UnboundedSender<Message>) -> Uuid {
        let id = Uuid::new_v4();
        self.inner
            .channels
            .entry(channel.to_owned())
            .or_default()
            .insert(id, tx);
        info!("Subscriber {} joined channel '{}'", id, channel);
        id
    }

    pub fn unsubscribe(&self, channel: &str, id: &Uuid) {
        if let Some(subscribers) = self.inner.channels.get(channel) {
            subscribers.remove(id);
        }
        if self
            .inner
            .channels
            .remove_if(channel, |_, subscribers| subscribers.is_empty())
            .is_some()
        {
            debug!("Channel '{}' is empty, removed", channel);
        }
        info!("Subscriber {} left channel '{}'", id, channel);
    }

    /// Sends `frame` to every subscriber of `channel`, the publisher included.
    ///
    /// Returns how many subscribers it reached.
    pub fn publish(&self, channel: &str, frame: Utf8Bytes) -> usize {
        let Some(subscribers) = self.inner.channels.get(channel) else {
            return 0;
        };

        let mut delivered = 0;
        let mut gone = Vec::new();
        for subscriber in subscribers.iter() {
            if subscriber.value().send(Message::Text(frame.clone())).is_ok() {
                delivered += 1;
            } else {
                gone.push(*subscriber.key());
            }
        }
        for id in gone {
            subscribers.remove(&id);
        }
        delivered
    }

    pub fn channel_count(&self) -> usize {
        self.inner.channels.len()
    }

    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.inner
            .channels
            .get(channel)
            .map_or(0, |subscribers| subscribers.len())
    }
}

impl Default for RelayService {
    fn default() -> Self {
        Self::new()
    }
}
