use serde::Serialize;

/// Offer/answer progress of one peer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NegotiationState {
    New,
    /// Our offer is set locally and published; waiting for the answer.
    HaveLocalOffer,
    /// The remote offer is applied; our answer is not yet set.
    HaveRemoteOffer,
    Stable,
}

impl NegotiationState {
    pub fn can_transition_to(self, next: NegotiationState) -> bool {
        use NegotiationState::*;

        matches!(
            (self, next),
            (New, HaveLocalOffer)
                | (New, HaveRemoteOffer)
                | (HaveLocalOffer, Stable)
                | (HaveRemoteOffer, HaveRemoteOffer)
                | (HaveRemoteOffer, Stable)
                | (Stable, HaveRemoteOffer)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Offerer,
    Answerer,
}
