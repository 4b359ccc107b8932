use std::collections::HashMap;

use meshlink_core::PeerId;
use tokio::sync::oneshot;

use crate::connection::NegotiationState;

/// Requests a [`MeshHandle`](crate::mesh::MeshHandle) sends to the running mesh.
#[derive(Debug)]
pub enum MeshCommand {
    /// Snapshot of every peer entry and its negotiation state.
    PeerStates(oneshot::Sender<HashMap<PeerId, NegotiationState>>),

    /// Close every connection and stop the loop. Unsent candidate batches are dropped.
    Shutdown,
}
