use crate::model::signaling::SignalMessage;
use serde::{Deserialize, Serialize};

/// Frame published on a bus topic: a named event and its payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BusEnvelope {
    pub name: String,
    pub data: serde_json::Value,
}

impl BusEnvelope {
    pub fn signal(event_name: &str, msg: &SignalMessage) -> serde_json::Result<Self> {
        Ok(Self {
            name: event_name.to_owned(),
            data: serde_json::to_value(msg)?,
        })
    }

    /// Decodes the payload when the envelope carries `event_name`.
    pub fn into_signal(self, event_name: &str) -> Option<serde_json::Result<SignalMessage>> {
        if self.name != event_name {
            return None;
        }
        Some(serde_json::from_value(self.data))
    }
}
