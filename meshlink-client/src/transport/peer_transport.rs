use async_trait::async_trait;
use meshlink_core::{IceCandidate, SessionDescription};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::media::LocalTrack;
use crate::transport::{TransportEvent, TransportId};

/// One native peer connection, as seen by the connection manager.
///
/// Every call is independently fallible; the manager decides what a failure
/// means for the negotiation.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn add_track(&self, track: LocalTrack) -> Result<()>;

    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

#[async_trait]
pub trait TransportFactory: Send + Sync {
    /// Opens the transport `id`. Its notifications go to `events`, tagged with `id`.
    async fn create(
        &self,
        id: TransportId,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn PeerTransport>>;
}
