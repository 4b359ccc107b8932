use dashmap::DashSet;
use meshlink_core::PeerId;
use tracing::{debug, info};

use crate::media::{LocalStream, RemoteStream};

/// Rendering surface for local and remote media.
///
/// `display_remote_media` may be called several times for one peer (once per
/// received track); implementations must ignore repeats for a peer already
/// shown.
pub trait Presenter: Send + Sync {
    fn display_local_media(&self, stream: &LocalStream);

    fn display_remote_media(&self, stream: RemoteStream, peer_id: &PeerId);
}

/// Presenter for headless participants: logs each new remote peer once.
#[derive(Default)]
pub struct LoggingPresenter {
    shown: DashSet<PeerId>,
}

impl LoggingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shown(&self, peer_id: &PeerId) -> bool {
        self.shown.contains(peer_id)
    }
}

impl Presenter for LoggingPresenter {
    fn display_local_media(&self, stream: &LocalStream) {
        info!(
            "Local stream {} ready with {} tracks",
            stream.id,
            stream.tracks.len()
        );
    }

    fn display_remote_media(&self, stream: RemoteStream, peer_id: &PeerId) {
        if !self.shown.insert(peer_id.clone()) {
            debug!("Remote media for {} already shown", peer_id);
            return;
        }
        info!("Showing remote stream {} from {}", stream.id, peer_id);
    }
}
