mod connection_manager;
mod negotiation_state;
mod peer_entry;

pub use connection_manager::*;
pub use negotiation_state::*;
pub use peer_entry::*;
