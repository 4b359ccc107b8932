use meshlink_client::NegotiationState;
use meshlink_core::{PeerId, SessionDescription};

use crate::integration::{create_test_manager, init_tracing};

#[tokio::test]
async fn test_failed_transport_creation_leaves_no_entry() {
    init_tracing();

    let mut t = create_test_manager("me");
    t.transports.fail_create();
    let peer = PeerId::from("p2");

    t.manager.create_offer(peer.clone()).await;
    t.manager
        .handle_offer(SessionDescription::offer("v=0"), PeerId::from("p3"))
        .await;

    assert!(t.manager.peer_states().is_empty());
    assert!(t.signaling.published().await.is_empty());
}

#[tokio::test]
async fn test_failed_offer_keeps_entry_in_new() {
    init_tracing();

    let mut t = create_test_manager("me");
    t.transports.fail_create_offer();
    let peer = PeerId::from("p2");

    t.manager.create_offer(peer.clone()).await;

    assert_eq!(t.manager.state_of(&peer), Some(NegotiationState::New));
    assert!(t.signaling.published().await.is_empty());

    // The peer can still connect by offering to us.
    t.manager
        .handle_offer(SessionDescription::offer("v=0"), peer.clone())
        .await;
    assert_eq!(t.manager.state_of(&peer), Some(NegotiationState::Stable));
    assert_eq!(t.transports.created_count().await, 1);
}

#[tokio::test]
async fn test_failed_remote_description_keeps_state_and_sends_nothing() {
    init_tracing();

    let mut t = create_test_manager("me");
    t.transports.fail_set_remote();
    let peer = PeerId::from("p2");

    t.manager
        .handle_offer(SessionDescription::offer("v=0"), peer.clone())
        .await;

    assert_eq!(t.manager.state_of(&peer), Some(NegotiationState::New));
    assert!(t.signaling.answers_to(&peer).await.is_empty());
}

#[tokio::test]
async fn test_publish_failure_is_not_fatal() {
    init_tracing();

    let mut t = create_test_manager("me");
    t.signaling.fail_publishes();
    let peer = PeerId::from("p2");

    t.manager.create_offer(peer.clone()).await;

    assert_eq!(
        t.manager.state_of(&peer),
        Some(NegotiationState::HaveLocalOffer)
    );
}
