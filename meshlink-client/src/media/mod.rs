mod local_media;
mod presenter;

pub use local_media::*;
pub use presenter::*;
