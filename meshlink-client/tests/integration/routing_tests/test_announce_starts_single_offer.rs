use meshlink_client::{NegotiationState, Role, SignalingRouter};
use meshlink_core::{PeerId, SignalMessage};

use crate::integration::{create_test_manager, init_tracing};

#[tokio::test]
async fn test_announce_starts_single_offer() {
    init_tracing();

    let mut t = create_test_manager("me");
    let router = SignalingRouter::new(PeerId::from("me"));
    let peer = PeerId::from("p2");

    for _ in 0..3 {
        router
            .dispatch(
                &mut t.manager,
                SignalMessage::announce(peer.clone()),
            )
            .await;
    }

    assert_eq!(t.transports.created_count().await, 1);
    assert_eq!(t.signaling.offers_to(&peer).await.len(), 1);
    assert_eq!(
        t.manager.state_of(&peer),
        Some(NegotiationState::HaveLocalOffer)
    );
    assert_eq!(t.manager.peer(&peer).map(|p| p.role()), Some(Role::Offerer));
}

#[tokio::test]
async fn test_announce_from_known_peer_is_ignored() {
    init_tracing();

    let mut t = create_test_manager("me");
    let router = SignalingRouter::new(PeerId::from("me"));
    let peer = PeerId::from("p2");

    router
        .dispatch(
            &mut t.manager,
            SignalMessage::Offer {
                sender: peer.clone(),
                target: PeerId::from("me"),
                offer: meshlink_core::SessionDescription::offer("v=0"),
            },
        )
        .await;
    router
        .dispatch(
            &mut t.manager,
            SignalMessage::announce(peer.clone()),
        )
        .await;

    assert_eq!(t.transports.created_count().await, 1);
    assert!(t.signaling.offers_to(&peer).await.is_empty());
    assert_eq!(t.manager.state_of(&peer), Some(NegotiationState::Stable));
}
