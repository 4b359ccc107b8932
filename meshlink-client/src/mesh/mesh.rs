use std::sync::Arc;

use meshlink_core::{PeerId, SignalMessage};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::batch::CandidateBatcher;
use crate::config::MeshConfig;
use crate::connection::ConnectionManager;
use crate::error::{MeshError, Result};
use crate::media::{MediaSource, Presenter};
use crate::mesh::{MeshCommand, MeshHandle};
use crate::signaling::{SignalingOutput, SignalingRouter, publish_logged};
use crate::transport::{TransportEvent, TransportFactory};

/// Collaborators a mesh talks to.
#[derive(Clone)]
pub struct MeshServices {
    pub signaling: Arc<dyn SignalingOutput>,
    pub transports: Arc<dyn TransportFactory>,
    pub media: Arc<dyn MediaSource>,
    pub presenter: Arc<dyn Presenter>,
}

/// One participant of a full-mesh call.
///
/// The mesh task is the only owner of the connection table and the candidate
/// batches: bus messages, transport events, batch flushes and handle commands
/// are handled one at a time from a single `select!` loop.
pub struct Mesh {
    config: MeshConfig,
    local_id: PeerId,
    services: MeshServices,
    inbound: mpsc::UnboundedReceiver<SignalMessage>,
    command_rx: mpsc::Receiver<MeshCommand>,
}

impl Mesh {
    pub fn new(
        config: MeshConfig,
        local_id: PeerId,
        services: MeshServices,
        inbound: mpsc::UnboundedReceiver<SignalMessage>,
    ) -> (Self, MeshHandle) {
        let (command_tx, command_rx) = mpsc::channel(100);
        let handle = MeshHandle::new(local_id.clone(), command_tx);

        let mesh = Self {
            config,
            local_id,
            services,
            inbound,
            command_rx,
        };
        (mesh, handle)
    }

    /// Joins the call and serves it until the bus subscription ends or
    /// [`MeshHandle::shutdown`] is called.
    ///
    /// Fails with [`MeshError::Media`] before publishing anything if local
    /// media cannot be acquired.
    pub async fn run(mut self) -> Result<()> {
        let local_stream = self.services.media.acquire().await.map_err(|e| match e {
            MeshError::Media(_) => e,
            other => MeshError::Media(other.to_string()),
        })?;
        self.services.presenter.display_local_media(&local_stream);

        let (transport_tx, mut transport_rx) = mpsc::channel(256);
        let (flush_tx, mut flush_rx) = mpsc::unbounded_channel();

        let mut manager = ConnectionManager::new(
            self.local_id.clone(),
            local_stream,
            self.services.transports.clone(),
            self.services.signaling.clone(),
            self.services.presenter.clone(),
            transport_tx,
        );
        let mut batcher = CandidateBatcher::new(self.config.candidate_batch_window, flush_tx);
        let router = SignalingRouter::new(self.local_id.clone());

        info!(
            "Joining channel {} as {}",
            self.config.channel, self.local_id
        );
        publish_logged(self.services.signaling.as_ref(), router.announce()).await;

        let mut commands_open = true;
        loop {
            tokio::select! {
                msg = self.inbound.recv() => {
                    match msg {
                        Some(m) => {
                            router.dispatch(&mut manager, m).await;
                            for peer_id in manager.take_withdrawn() {
                                batcher.discard(&peer_id);
                            }
                        }
                        None => {
                            info!("Bus subscription closed. Leaving mesh.");
                            break;
                        }
                    }
                }

                Some(evt) = transport_rx.recv() => {
                    self.handle_transport_event(evt, &mut manager, &mut batcher);
                }

                Some(peer_id) = flush_rx.recv() => {
                    self.flush_candidates(&mut batcher, peer_id).await;
                }

                cmd = self.command_rx.recv(), if commands_open => {
                    match cmd {
                        Some(MeshCommand::PeerStates(reply)) => {
                            let _ = reply.send(manager.peer_states());
                        }
                        Some(MeshCommand::Shutdown) => {
                            info!("Shutdown requested");
                            break;
                        }
                        None => {
                            debug!("All mesh handles dropped");
                            commands_open = false;
                        }
                    }
                }
            }
        }

        manager.close_all().await;
        info!("Mesh event loop finished");
        Ok(())
    }

    fn handle_transport_event(
        &self,
        event: TransportEvent,
        manager: &mut ConnectionManager,
        batcher: &mut CandidateBatcher,
    ) {
        if !manager.is_current(event.source()) {
            debug!("Ignoring event from replaced transport {}", event.source());
            return;
        }

        match event {
            TransportEvent::CandidateGenerated(id, candidate) => {
                batcher.queue_candidate(id.peer_id, candidate);
            }

            TransportEvent::RemoteMedia(id, stream) => {
                manager.handle_remote_media(&id.peer_id, stream);
            }

            TransportEvent::ConnectionStateChanged(id, state) => {
                info!("Connection to {} is now {}", id.peer_id, state);
            }
        }
    }

    async fn flush_candidates(&self, batcher: &mut CandidateBatcher, peer_id: PeerId) {
        let Some(candidates) = batcher.flush_candidate_batch(&peer_id) else {
            debug!("Flush for {} with nothing queued", peer_id);
            return;
        };

        let msg = SignalMessage::Candidates {
            sender: self.local_id.clone(),
            target: peer_id,
            candidates,
        };
        publish_logged(self.services.signaling.as_ref(), msg).await;
    }
}
