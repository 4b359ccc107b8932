use crate::model::candidate::IceCandidate;
use crate::model::peer::PeerId;
use crate::model::session::SessionDescription;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

/// One signaling message as carried by the `signal` event on the room topic.
///
/// Every kind except `announce` is addressed to exactly one participant. An
/// `announce` is for everyone unless it names a `target`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SignalMessage {
    Announce {
        sender: PeerId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<PeerId>,
    },
    Offer {
        sender: PeerId,
        target: PeerId,
        offer: SessionDescription,
    },
    Answer {
        sender: PeerId,
        target: PeerId,
        answer: SessionDescription,
    },
    /// Single candidate, sent by peers that do not batch.
    Candidate {
        sender: PeerId,
        target: PeerId,
        candidate: IceCandidate,
    },
    Candidates {
        sender: PeerId,
        target: PeerId,
        candidates: Vec<IceCandidate>,
    },
    /// Any kind this version does not know about.
    #[serde(other)]
    Unknown,
}

impl SignalMessage {
    /// Announce addressed to the whole topic.
    pub fn announce(sender: PeerId) -> Self {
        SignalMessage::Announce {
            sender,
            target: None,
        }
    }

    pub fn sender(&self) -> Option<&PeerId> {
        match self {
            SignalMessage::Announce { sender, .. }
            | SignalMessage::Offer { sender, .. }
            | SignalMessage::Answer { sender, .. }
            | SignalMessage::Candidate { sender, .. }
            | SignalMessage::Candidates { sender, .. } => Some(sender),
            SignalMessage::Unknown => None,
        }
    }

    pub fn target(&self) -> Option<&PeerId> {
        match self {
            SignalMessage::Announce { target, .. } => target.as_ref(),
            SignalMessage::Offer { target, .. }
            | SignalMessage::Answer { target, .. }
            | SignalMessage::Candidate { target, .. }
            | SignalMessage::Candidates { target, .. } => Some(target),
            SignalMessage::Unknown => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SignalMessage::Announce { .. } => "announce",
            SignalMessage::Offer { .. } => "offer",
            SignalMessage::Answer { .. } => "answer",
            SignalMessage::Candidate { .. } => "candidate",
            SignalMessage::Candidates { .. } => "candidates",
            SignalMessage::Unknown => "unknown",
        }
    }
}
