mod candidate_batcher;

pub use candidate_batcher::*;
