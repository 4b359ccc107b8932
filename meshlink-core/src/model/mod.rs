mod candidate;
mod envelope;
mod peer;
mod session;
mod signaling;

pub use candidate::IceCandidate;
pub use envelope::BusEnvelope;
pub use peer::PeerId;
pub use session::{SdpKind, SessionDescription};
pub use signaling::{IceServerConfig, SignalMessage};
