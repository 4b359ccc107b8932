mod local_bus;
mod signaling_output;
mod signaling_router;
mod ws_bus;

pub use local_bus::*;
pub use signaling_output::*;
pub use signaling_router::*;
pub use ws_bus::*;
