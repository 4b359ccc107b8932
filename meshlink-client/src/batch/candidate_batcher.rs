use std::collections::HashMap;
use std::time::Duration;

use meshlink_core::{IceCandidate, PeerId};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

#[derive(Default)]
struct CandidateBatch {
    candidates: Vec<IceCandidate>,
    flush_scheduled: bool,
}

/// Coalesces locally discovered candidates per remote peer.
///
/// The first candidate queued for a peer arms a timer; when it fires the peer
/// id is posted to `flush_tx` and the owner calls [`flush_candidate_batch`]
/// to take everything gathered in the meantime.
///
/// [`flush_candidate_batch`]: CandidateBatcher::flush_candidate_batch
pub struct CandidateBatcher {
    window: Duration,
    batches: HashMap<PeerId, CandidateBatch>,
    flush_tx: mpsc::UnboundedSender<PeerId>,
}

impl CandidateBatcher {
    pub fn new(window: Duration, flush_tx: mpsc::UnboundedSender<PeerId>) -> Self {
        Self {
            window,
            batches: HashMap::new(),
            flush_tx,
        }
    }

    pub fn queue_candidate(&mut self, peer_id: PeerId, candidate: IceCandidate) {
        let batch = self.batches.entry(peer_id.clone()).or_default();
        batch.candidates.push(candidate);

        if batch.flush_scheduled {
            return;
        }
        batch.flush_scheduled = true;

        let deadline = Instant::now() + self.window;
        let flush_tx = self.flush_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // Receiver gone means the mesh stopped; the batch is dropped with it.
            let _ = flush_tx.send(peer_id);
        });
    }

    /// Takes the batch for `peer_id`, or `None` if nothing was queued.
    pub fn flush_candidate_batch(&mut self, peer_id: &PeerId) -> Option<Vec<IceCandidate>> {
        let batch = self.batches.get_mut(peer_id)?;
        batch.flush_scheduled = false;

        if batch.candidates.is_empty() {
            return None;
        }
        let candidates = std::mem::take(&mut batch.candidates);
        debug!("Flushing {} candidates for {}", candidates.len(), peer_id);
        Some(candidates)
    }

    /// Drops whatever is queued for `peer_id`. A timer already armed for it
    /// still fires and takes only what was queued after the discard.
    pub fn discard(&mut self, peer_id: &PeerId) {
        if let Some(batch) = self.batches.remove(peer_id) {
            debug!(
                "Discarding {} queued candidates for {}",
                batch.candidates.len(),
                peer_id
            );
        }
    }

    pub fn pending(&self, peer_id: &PeerId) -> usize {
        self.batches
            .get(peer_id)
            .map_or(0, |batch| batch.candidates.len())
    }

    pub fn is_scheduled(&self, peer_id: &PeerId) -> bool {
        self.batches
            .get(peer_id)
            .is_some_and(|batch| batch.flush_scheduled)
    }
}
