//! Full-mesh call coordination: one peer connection per remote participant,
//! negotiated over a shared publish/subscribe topic.

pub mod batch;
pub mod config;
pub mod connection;
pub mod error;
pub mod media;
pub mod mesh;
pub mod signaling;
pub mod transport;

pub use batch::*;
pub use config::*;
pub use connection::*;
pub use error::*;
pub use media::*;
pub use mesh::*;
pub use signaling::*;
pub use transport::*;
