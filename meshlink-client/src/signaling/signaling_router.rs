use meshlink_core::{IceCandidate, PeerId, SessionDescription, SignalMessage};
use tracing::{debug, trace};

use crate::connection::ConnectionManager;

/// A signaling message that passed filtering, with only what its handler needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Announce {
        sender: PeerId,
    },
    Offer {
        sender: PeerId,
        offer: SessionDescription,
    },
    Answer {
        sender: PeerId,
        answer: SessionDescription,
    },
    Candidates {
        sender: PeerId,
        candidates: Vec<IceCandidate>,
    },
}

/// Filters bus traffic down to messages for this participant and hands them
/// to the connection manager.
pub struct SignalingRouter {
    local_id: PeerId,
}

impl SignalingRouter {
    pub fn new(local_id: PeerId) -> Self {
        Self { local_id }
    }

    pub fn announce(&self) -> SignalMessage {
        SignalMessage::announce(self.local_id.clone())
    }

    /// Drops our own echoes, messages addressed to someone else and unknown kinds.
    pub fn route(&self, msg: SignalMessage) -> Option<Dispatch> {
        if msg.sender() == Some(&self.local_id) {
            trace!("Ignoring own {} message", msg.kind());
            return None;
        }
        if msg.target().is_some_and(|target| target != &self.local_id) {
            trace!("Ignoring {} message for another peer", msg.kind());
            return None;
        }

        match msg {
            SignalMessage::Announce { sender, .. } => Some(Dispatch::Announce { sender }),
            SignalMessage::Offer { sender, offer, .. } => Some(Dispatch::Offer { sender, offer }),
            SignalMessage::Answer { sender, answer, .. } => {
                Some(Dispatch::Answer { sender, answer })
            }
            SignalMessage::Candidate {
                sender, candidate, ..
            } => Some(Dispatch::Candidates {
                sender,
                candidates: vec![candidate],
            }),
            SignalMessage::Candidates {
                sender, candidates, ..
            } => Some(Dispatch::Candidates { sender, candidates }),
            SignalMessage::Unknown => {
                debug!("Ignoring signaling message of unknown kind");
                None
            }
        }
    }

    pub async fn dispatch(&self, manager: &mut ConnectionManager, msg: SignalMessage) {
        let Some(dispatch) = self.route(msg) else {
            return;
        };

        match dispatch {
            Dispatch::Announce { sender } => {
                if manager.has_peer(&sender) {
                    debug!("Already connected to {}, ignoring announce", sender);
                    return;
                }
                manager.create_offer(sender).await;
            }
            Dispatch::Offer { sender, offer } => manager.handle_offer(offer, sender).await,
            Dispatch::Answer { sender, answer } => manager.handle_answer(answer, sender).await,
            Dispatch::Candidates { sender, candidates } => {
                for candidate in candidates {
                    manager.handle_candidate(candidate, sender.clone()).await;
                }
            }
        }
    }
}
