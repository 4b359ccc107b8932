use std::collections::HashMap;
use std::sync::Arc;

use meshlink_core::{IceCandidate, PeerId, SessionDescription, SignalMessage};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::connection::{NegotiationState, PeerEntry, Role};
use crate::error::{MeshError, Result};
use crate::media::{LocalStream, Presenter, RemoteStream};
use crate::signaling::{SignalingOutput, publish_logged};
use crate::transport::{TransportEvent, TransportFactory, TransportId};

/// Owns one peer connection per remote participant and drives the offer/answer
/// exchange for each of them.
///
/// All methods take `&mut self`: the manager lives inside the mesh loop and is
/// never shared, so every handler finishes before the next one starts.
pub struct ConnectionManager {
    local_id: PeerId,
    local_stream: LocalStream,
    peers: HashMap<PeerId, PeerEntry>,
    /// Candidates from peers we have no entry for yet.
    early_candidates: HashMap<PeerId, Vec<IceCandidate>>,
    /// Peers whose offer we withdrew since the last [`take_withdrawn`] call.
    ///
    /// [`take_withdrawn`]: ConnectionManager::take_withdrawn
    withdrawn: Vec<PeerId>,
    next_generation: u64,
    transports: Arc<dyn TransportFactory>,
    signaling: Arc<dyn SignalingOutput>,
    presenter: Arc<dyn Presenter>,
    event_tx: mpsc::Sender<TransportEvent>,
}

impl ConnectionManager {
    pub fn new(
        local_id: PeerId,
        local_stream: LocalStream,
        transports: Arc<dyn TransportFactory>,
        signaling: Arc<dyn SignalingOutput>,
        presenter: Arc<dyn Presenter>,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Self {
        Self {
            local_id,
            local_stream,
            peers: HashMap::new(),
            early_candidates: HashMap::new(),
            withdrawn: Vec::new(),
            next_generation: 1,
            transports,
            signaling,
            presenter,
            event_tx,
        }
    }

    pub fn local_id(&self) -> &PeerId {
        &self.local_id
    }

    pub fn has_peer(&self, peer_id: &PeerId) -> bool {
        self.peers.contains_key(peer_id)
    }

    pub fn peer(&self, peer_id: &PeerId) -> Option<&PeerEntry> {
        self.peers.get(peer_id)
    }

    pub fn state_of(&self, peer_id: &PeerId) -> Option<NegotiationState> {
        self.peers.get(peer_id).map(|entry| entry.state)
    }

    pub fn peer_states(&self) -> HashMap<PeerId, NegotiationState> {
        self.peers
            .iter()
            .map(|(id, entry)| (id.clone(), entry.state))
            .collect()
    }

    /// Whether `id` is the transport currently serving its peer.
    pub fn is_current(&self, id: &TransportId) -> bool {
        self.peers
            .get(&id.peer_id)
            .is_some_and(|entry| &entry.id == id)
    }

    /// Peers whose transport was replaced after an offer collision. Local
    /// candidates still queued for them came from the closed transport.
    pub fn take_withdrawn(&mut self) -> Vec<PeerId> {
        std::mem::take(&mut self.withdrawn)
    }

    /// Remote candidates held back for `peer_id` until its remote description is set.
    pub fn buffered_candidates(&self, peer_id: &PeerId) -> usize {
        let in_entry = self
            .peers
            .get(peer_id)
            .map_or(0, |entry| entry.pending_candidates.len());
        let early = self.early_candidates.get(peer_id).map_or(0, Vec::len);
        in_entry + early
    }

    /// Starts an outbound exchange with `peer_id` unless one already exists.
    pub async fn create_offer(&mut self, peer_id: PeerId) {
        if self.peers.contains_key(&peer_id) {
            debug!("Connection to {} already exists, not offering", peer_id);
            return;
        }

        info!("Creating offer for {}", peer_id);
        if let Err(e) = self.open_entry(&peer_id, Role::Offerer).await {
            error!("Error creating connection for {}: {}", peer_id, e);
            return;
        }

        match self.send_offer(&peer_id).await {
            Ok(offer) => {
                publish_logged(
                    self.signaling.as_ref(),
                    SignalMessage::Offer {
                        sender: self.local_id.clone(),
                        target: peer_id,
                        offer,
                    },
                )
                .await;
            }
            Err(e) => error!("Error creating offer for {}: {}", peer_id, e),
        }
    }

    pub async fn handle_offer(&mut self, offer: SessionDescription, sender_id: PeerId) {
        info!("Handling offer from {}", sender_id);

        if self.state_of(&sender_id) == Some(NegotiationState::HaveLocalOffer) {
            if self.local_id < sender_id {
                info!("Offer collision with {}: keeping our offer", sender_id);
                return;
            }
            info!("Offer collision with {}: withdrawing our offer", sender_id);
            self.withdraw_offer(&sender_id).await;
        }

        if let Some(entry) = self.peers.get_mut(&sender_id) {
            entry.role = Role::Answerer;
        } else if let Err(e) = self.open_entry(&sender_id, Role::Answerer).await {
            error!("Error creating connection for {}: {}", sender_id, e);
            return;
        }

        match self.send_answer(&sender_id, offer).await {
            Ok(answer) => {
                publish_logged(
                    self.signaling.as_ref(),
                    SignalMessage::Answer {
                        sender: self.local_id.clone(),
                        target: sender_id,
                        answer,
                    },
                )
                .await;
            }
            Err(e) => error!("Error handling offer from {}: {}", sender_id, e),
        }
    }

    pub async fn handle_answer(&mut self, answer: SessionDescription, sender_id: PeerId) {
        let Some(entry) = self.peers.get_mut(&sender_id) else {
            debug!("No connection for answer from {}, dropping", sender_id);
            return;
        };
        if entry.state != NegotiationState::HaveLocalOffer {
            warn!(
                "Ignoring answer from {} in state {:?}",
                sender_id, entry.state
            );
            return;
        }

        info!("Handling answer from {}", sender_id);
        if let Err(e) = entry.transport.set_remote_description(answer).await {
            error!(
                "Error setting remote description from answer ({}): {}",
                sender_id, e
            );
            return;
        }
        entry.remote_description_set = true;
        entry.transition(&sender_id, NegotiationState::Stable);
        entry.apply_pending_candidates(&sender_id).await;
    }

    /// Applies a remote candidate, or holds it until the remote description is set.
    pub async fn handle_candidate(&mut self, candidate: IceCandidate, sender_id: PeerId) {
        match self.peers.get_mut(&sender_id) {
            Some(entry) if entry.remote_description_set => {
                if let Err(e) = entry.transport.add_ice_candidate(candidate).await {
                    warn!("Error adding ICE candidate from {}: {}", sender_id, e);
                }
            }
            Some(entry) => {
                debug!("Buffering candidate from {} until negotiated", sender_id);
                entry.pending_candidates.push(candidate);
            }
            None => {
                debug!("Buffering candidate from unknown peer {}", sender_id);
                self.early_candidates
                    .entry(sender_id)
                    .or_default()
                    .push(candidate);
            }
        }
    }

    /// Hands media from an established connection to the presenter.
    pub fn handle_remote_media(&self, peer_id: &PeerId, stream: RemoteStream) {
        if !self.peers.contains_key(peer_id) {
            debug!("Remote media from unknown peer {}, ignoring", peer_id);
            return;
        }
        info!("Received remote track from {}", peer_id);
        self.presenter.display_remote_media(stream, peer_id);
    }

    pub async fn close_all(&mut self) {
        for (peer_id, entry) in self.peers.drain() {
            if let Err(e) = entry.transport.close().await {
                warn!("Error closing connection to {}: {}", peer_id, e);
            }
        }
    }

    async fn open_entry(&mut self, peer_id: &PeerId, role: Role) -> Result<()> {
        let id = TransportId::new(peer_id.clone(), self.next_generation);
        self.next_generation += 1;
        let transport = self.transports.create(id.clone(), self.event_tx.clone()).await?;

        for track in &self.local_stream.tracks {
            if let Err(e) = transport.add_track(track.clone()).await {
                warn!("Error attaching local track for {}: {}", peer_id, e);
            }
        }

        let mut entry = PeerEntry::new(id, role, transport);
        if let Some(early) = self.early_candidates.remove(peer_id) {
            entry.pending_candidates = early;
        }
        self.peers.insert(peer_id.clone(), entry);
        Ok(())
    }

    async fn send_offer(&mut self, peer_id: &PeerId) -> Result<SessionDescription> {
        let entry = self.entry_mut(peer_id)?;

        let offer = entry.transport.create_offer().await?;
        entry.transport.set_local_description(offer.clone()).await?;
        entry.transition(peer_id, NegotiationState::HaveLocalOffer);
        Ok(offer)
    }

    async fn send_answer(
        &mut self,
        peer_id: &PeerId,
        offer: SessionDescription,
    ) -> Result<SessionDescription> {
        let entry = self.entry_mut(peer_id)?;

        entry.transport.set_remote_description(offer).await?;
        entry.remote_description_set = true;
        entry.transition(peer_id, NegotiationState::HaveRemoteOffer);
        entry.apply_pending_candidates(peer_id).await;

        let answer = entry.transport.create_answer().await?;
        entry.transport.set_local_description(answer.clone()).await?;
        entry.transition(peer_id, NegotiationState::Stable);
        Ok(answer)
    }

    /// Drops our pending offer to `peer_id` so its offer can be answered.
    ///
    /// Candidates already received from the peer belong to its connection,
    /// not ours, so they are kept for the replacement entry.
    async fn withdraw_offer(&mut self, peer_id: &PeerId) {
        let Some(old) = self.peers.remove(peer_id) else {
            return;
        };
        if let Err(e) = old.transport.close().await {
            warn!("Error closing withdrawn connection to {}: {}", peer_id, e);
        }
        self.withdrawn.push(peer_id.clone());
        if !old.pending_candidates.is_empty() {
            self.early_candidates
                .entry(peer_id.clone())
                .or_default()
                .extend(old.pending_candidates);
        }
    }

    fn entry_mut(&mut self, peer_id: &PeerId) -> Result<&mut PeerEntry> {
        self.peers
            .get_mut(peer_id)
            .ok_or_else(|| MeshError::Negotiation {
                peer: peer_id.clone(),
                reason: "no connection entry".to_owned(),
            })
    }
}
