use meshlink_client::SignalingRouter;
use meshlink_core::{PeerId, SessionDescription, SignalMessage};

use crate::integration::{create_test_manager, init_tracing, remote_candidate};

fn every_kind(sender: &str, target: &str) -> Vec<SignalMessage> {
    let sender = PeerId::from(sender);
    let target = PeerId::from(target);
    vec![
        SignalMessage::Announce {
            sender: sender.clone(),
            target: Some(target.clone()),
        },
        SignalMessage::Offer {
            sender: sender.clone(),
            target: target.clone(),
            offer: SessionDescription::offer("v=0"),
        },
        SignalMessage::Answer {
            sender: sender.clone(),
            target: target.clone(),
            answer: SessionDescription::answer("v=0"),
        },
        SignalMessage::Candidate {
            sender: sender.clone(),
            target: target.clone(),
            candidate: remote_candidate(1),
        },
        SignalMessage::Candidates {
            sender,
            target,
            candidates: vec![remote_candidate(1), remote_candidate(2)],
        },
    ]
}

#[tokio::test]
async fn test_own_messages_are_never_dispatched() {
    init_tracing();

    let mut t = create_test_manager("me");
    let router = SignalingRouter::new(PeerId::from("me"));

    for msg in every_kind("me", "me") {
        assert_eq!(router.route(msg.clone()), None, "{} routed", msg.kind());
        router.dispatch(&mut t.manager, msg).await;
    }

    assert_eq!(t.transports.created_count().await, 0);
    assert!(t.signaling.published().await.is_empty());
    assert!(t.manager.peer_states().is_empty());
}

#[tokio::test]
async fn test_messages_for_other_peers_are_never_dispatched() {
    init_tracing();

    let mut t = create_test_manager("me");
    let router = SignalingRouter::new(PeerId::from("me"));

    for msg in every_kind("p2", "p3") {
        assert_eq!(router.route(msg.clone()), None, "{} routed", msg.kind());
        router.dispatch(&mut t.manager, msg).await;
    }

    assert_eq!(t.transports.created_count().await, 0);
    assert!(t.signaling.published().await.is_empty());
    assert_eq!(t.manager.buffered_candidates(&PeerId::from("p2")), 0);
}

#[tokio::test]
async fn test_wire_announce_for_other_peer_starts_nothing() {
    init_tracing();

    let mut t = create_test_manager("me");
    let router = SignalingRouter::new(PeerId::from("me"));

    let msg: SignalMessage =
        serde_json::from_str(r#"{"type":"announce","sender":"p2","target":"p3"}"#).unwrap();
    assert_eq!(router.route(msg.clone()), None);
    router.dispatch(&mut t.manager, msg).await;

    assert_eq!(t.transports.created_count().await, 0);
    assert!(t.signaling.published().await.is_empty());
}

#[tokio::test]
async fn test_announce_addressed_to_us_is_answered_with_offer() {
    init_tracing();

    let mut t = create_test_manager("me");
    let router = SignalingRouter::new(PeerId::from("me"));
    let peer = PeerId::from("p2");

    let msg: SignalMessage =
        serde_json::from_str(r#"{"type":"announce","sender":"p2","target":"me"}"#).unwrap();
    router.dispatch(&mut t.manager, msg).await;

    assert_eq!(t.transports.created_count().await, 1);
    assert_eq!(t.signaling.offers_to(&peer).await.len(), 1);
}

#[tokio::test]
async fn test_unknown_kind_is_ignored() {
    init_tracing();

    let mut t = create_test_manager("me");
    let router = SignalingRouter::new(PeerId::from("me"));

    let msg: SignalMessage =
        serde_json::from_str(r#"{"type":"bye","sender":"p2","target":"me"}"#).unwrap();
    router.dispatch(&mut t.manager, msg).await;

    assert_eq!(t.transports.created_count().await, 0);
    assert!(t.signaling.published().await.is_empty());
}
