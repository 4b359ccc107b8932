use std::time::Duration;

use meshlink_client::{LocalBus, NegotiationState};
use meshlink_core::{PeerId, SignalMessage};

use crate::integration::{init_tracing, spawn_participant, wait_for_stable};

#[tokio::test(start_paused = true)]
async fn test_two_participants_reach_stable() {
    init_tracing();

    let bus = LocalBus::new();
    let mut observer = bus.subscribe();
    let a = spawn_participant(&bus, "a");
    let b = spawn_participant(&bus, "b");

    assert!(wait_for_stable(&a.handle, 1).await, "a never settled");
    assert!(wait_for_stable(&b.handle, 1).await, "b never settled");

    // Let every candidate batch go out and be applied.
    tokio::time::sleep(Duration::from_secs(1)).await;

    let a_states = a.handle.peer_states().await.unwrap();
    let b_states = b.handle.peer_states().await.unwrap();
    assert_eq!(a_states.get(&PeerId::from("b")), Some(&NegotiationState::Stable));
    assert_eq!(b_states.get(&PeerId::from("a")), Some(&NegotiationState::Stable));

    assert!(!a.transports.applied_candidates(&PeerId::from("b")).await.is_empty());
    assert!(!b.transports.applied_candidates(&PeerId::from("a")).await.is_empty());

    assert!(a.presenter.remote_calls().contains(&PeerId::from("b")));
    assert!(b.presenter.remote_calls().contains(&PeerId::from("a")));

    let mut answers = 0;
    while let Ok(msg) = observer.try_recv() {
        if matches!(msg, SignalMessage::Answer { .. }) {
            answers += 1;
        }
    }
    assert_eq!(answers, 1, "exactly one offer/answer exchange per pair");
}

#[tokio::test(start_paused = true)]
async fn test_three_participants_form_full_mesh() {
    init_tracing();

    let bus = LocalBus::new();
    let participants = [
        spawn_participant(&bus, "a"),
        spawn_participant(&bus, "b"),
        spawn_participant(&bus, "c"),
    ];

    for p in &participants {
        assert!(
            wait_for_stable(&p.handle, 2).await,
            "{} never settled",
            p.handle.local_id()
        );
    }

    tokio::time::sleep(Duration::from_secs(1)).await;
    for p in &participants {
        let states = p.handle.peer_states().await.unwrap();
        assert_eq!(states.len(), 2);
        assert!(states.values().all(|s| *s == NegotiationState::Stable));
        assert!(!states.contains_key(p.handle.local_id()));
    }
}

#[tokio::test(start_paused = true)]
async fn test_late_joiner_connects_to_everyone() {
    init_tracing();

    let bus = LocalBus::new();
    let a = spawn_participant(&bus, "a");
    let b = spawn_participant(&bus, "b");
    assert!(wait_for_stable(&a.handle, 1).await);

    let c = spawn_participant(&bus, "c");
    assert!(wait_for_stable(&c.handle, 2).await);
    assert!(wait_for_stable(&a.handle, 2).await);
    assert!(wait_for_stable(&b.handle, 2).await);
}
