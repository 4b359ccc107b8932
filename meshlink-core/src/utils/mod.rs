pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";

/// Topic every participant joins.
pub const DEFAULT_CHANNEL: &str = "webrtc-demo";

/// Event name signaling messages are published under.
pub const SIGNAL_EVENT: &str = "signal";

/// Quiescent window before a candidate batch is flushed, in milliseconds.
pub const DEFAULT_CANDIDATE_BATCH_MS: u64 = 300;
