use std::time::Duration;

use meshlink_core::utils::{DEFAULT_CANDIDATE_BATCH_MS, DEFAULT_CHANNEL, SIGNAL_EVENT};

use crate::transport::TransportConfig;

#[derive(Debug, Clone)]
pub struct MeshConfig {
    /// Bus topic shared by all participants.
    pub channel: String,
    /// Event name signaling messages are published under.
    pub event_name: String,
    /// Quiescent window after the first queued candidate before the batch is sent.
    pub candidate_batch_window: Duration,
    pub transport: TransportConfig,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_owned(),
            event_name: SIGNAL_EVENT.to_owned(),
            candidate_batch_window: Duration::from_millis(DEFAULT_CANDIDATE_BATCH_MS),
            transport: TransportConfig::default(),
        }
    }
}
