use meshlink_core::{IceCandidate, PeerId};
use tracing::{debug, warn};

use crate::connection::{NegotiationState, Role};
use crate::transport::{PeerTransport, TransportId};

/// Connection state kept for one remote participant.
pub struct PeerEntry {
    pub(crate) id: TransportId,
    pub(crate) role: Role,
    pub(crate) state: NegotiationState,
    pub(crate) remote_description_set: bool,
    pub(crate) transport: Box<dyn PeerTransport>,
    /// Remote candidates received before the remote description was applied.
    pub(crate) pending_candidates: Vec<IceCandidate>,
}

impl PeerEntry {
    pub(crate) fn new(id: TransportId, role: Role, transport: Box<dyn PeerTransport>) -> Self {
        Self {
            id,
            role,
            state: NegotiationState::New,
            remote_description_set: false,
            transport,
            pending_candidates: Vec::new(),
        }
    }

    pub fn transport_id(&self) -> &TransportId {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub(crate) fn transition(&mut self, peer_id: &PeerId, next: NegotiationState) -> bool {
        if !self.state.can_transition_to(next) {
            warn!(
                "Refusing transition {:?} -> {:?} for {}",
                self.state, next, peer_id
            );
            return false;
        }
        debug!("{}: {:?} -> {:?}", peer_id, self.state, next);
        self.state = next;
        true
    }

    /// Applies buffered candidates in arrival order.
    pub(crate) async fn apply_pending_candidates(&mut self, peer_id: &PeerId) {
        if self.pending_candidates.is_empty() {
            return;
        }
        debug!(
            "Applying {} buffered candidates from {}",
            self.pending_candidates.len(),
            peer_id
        );
        for candidate in std::mem::take(&mut self.pending_candidates) {
            if let Err(e) = self.transport.add_ice_candidate(candidate).await {
                warn!("Error adding ICE candidate from {}: {}", peer_id, e);
            }
        }
    }
}
