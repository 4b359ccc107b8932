pub use meshlink_core::model::PeerId;
pub use meshlink_core::utils;

pub mod model {
    pub use meshlink_core::model::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use meshlink_client::*;
}

#[cfg(feature = "relay")]
pub mod relay {
    pub use meshlink_relay::*;
}
