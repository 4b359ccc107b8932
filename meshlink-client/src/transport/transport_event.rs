use std::fmt;

use meshlink_core::{IceCandidate, PeerId};
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;

use crate::media::RemoteStream;

/// One transport towards a peer. A peer gets a new generation each time its
/// connection is replaced, so events from a closed transport can be told apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransportId {
    pub peer_id: PeerId,
    pub generation: u64,
}

impl TransportId {
    pub fn new(peer_id: PeerId, generation: u64) -> Self {
        Self {
            peer_id,
            generation,
        }
    }
}

impl fmt::Display for TransportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.peer_id, self.generation)
    }
}

/// Notifications a transport raises for the mesh loop.
pub enum TransportEvent {
    /// A local candidate was discovered and must reach the remote peer.
    CandidateGenerated(TransportId, IceCandidate),

    /// A remote track arrived on an established connection.
    RemoteMedia(TransportId, RemoteStream),

    ConnectionStateChanged(TransportId, RTCPeerConnectionState),
}

impl TransportEvent {
    pub fn source(&self) -> &TransportId {
        match self {
            TransportEvent::CandidateGenerated(id, _)
            | TransportEvent::RemoteMedia(id, _)
            | TransportEvent::ConnectionStateChanged(id, _) => id,
        }
    }
}
