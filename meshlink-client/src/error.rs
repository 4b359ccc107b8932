use meshlink_core::PeerId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    /// Local capture failed. Fatal for the session.
    #[error("media acquisition failed: {0}")]
    Media(String),

    #[error("transport error: {0}")]
    Transport(#[from] webrtc::Error),

    #[error("signaling bus error: {0}")]
    Bus(String),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("invalid signaling payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("negotiation with {peer} failed: {reason}")]
    Negotiation { peer: PeerId, reason: String },

    #[error("mesh is not running")]
    Closed,
}

pub type Result<T> = std::result::Result<T, MeshError>;
