use meshlink_client::SignalingRouter;
use meshlink_core::{PeerId, SessionDescription, SignalMessage};

use crate::integration::{create_test_manager, init_tracing, remote_candidate};
use crate::utils::TransportCall;

#[tokio::test]
async fn test_candidates_applied_in_order() {
    init_tracing();

    let mut t = create_test_manager("me");
    let router = SignalingRouter::new(PeerId::from("me"));
    let peer = PeerId::from("p2");
    let me = PeerId::from("me");

    router
        .dispatch(
            &mut t.manager,
            SignalMessage::Offer {
                sender: peer.clone(),
                target: me.clone(),
                offer: SessionDescription::offer("v=0"),
            },
        )
        .await;

    router
        .dispatch(
            &mut t.manager,
            SignalMessage::Candidates {
                sender: peer.clone(),
                target: me.clone(),
                candidates: vec![remote_candidate(1), remote_candidate(2), remote_candidate(3)],
            },
        )
        .await;
    router
        .dispatch(
            &mut t.manager,
            SignalMessage::Candidate {
                sender: peer.clone(),
                target: me,
                candidate: remote_candidate(4),
            },
        )
        .await;

    assert_eq!(
        t.transports.applied_candidates(&peer).await,
        vec![
            remote_candidate(1),
            remote_candidate(2),
            remote_candidate(3),
            remote_candidate(4)
        ]
    );
}

#[tokio::test]
async fn test_empty_candidates_message_touches_nothing() {
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
                offer: SessionDescription::offer("v=0"),
            },
        )
        .await;
    let before = t.transports.calls_for(&peer).await;

    router
        .dispatch(
            &mut t.manager,
            SignalMessage::Candidates {
                sender: peer.clone(),
                target: PeerId::from("me"),
                candidates: vec![],
            },
        )
        .await;

    assert_eq!(t.transports.calls_for(&peer).await, before);
    assert!(
        !before
            .iter()
            .any(|c| matches!(c, TransportCall::AddCandidate(_)))
    );
}
