use std::collections::HashMap;

use meshlink_core::PeerId;
use tokio::sync::{mpsc, oneshot};

use crate::connection::NegotiationState;
use crate::error::{MeshError, Result};
use crate::mesh::MeshCommand;

#[derive(Clone)]
pub struct MeshHandle {
    local_id: PeerId,
    command_tx: mpsc::Sender<MeshCommand>,
}

impl MeshHandle {
    pub(crate) fn new(local_id: PeerId, command_tx: mpsc::Sender<MeshCommand>) -> Self {
        Self {
            local_id,
            command_tx,
        }
    }

    pub fn local_id(&self) -> &PeerId {
        &self.local_id
    }

    pub async fn peer_states(&self) -> Result<HashMap<PeerId, NegotiationState>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(MeshCommand::PeerStates(reply_tx))
            .await
            .map_err(|_| MeshError::Closed)?;
        reply_rx.await.map_err(|_| MeshError::Closed)
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(MeshCommand::Shutdown)
            .await
            .map_err(|_| MeshError::Closed)
    }
}
