use std::sync::Arc;
use std::time::Duration;

use meshlink_client::{Mesh, MeshConfig, MeshServices};
use meshlink_core::{PeerId, SessionDescription, SignalMessage};
use tokio::sync::mpsc;

use crate::integration::init_tracing;
use crate::utils::{
    EmptyMediaSource, MOCK_CANDIDATES_PER_DESCRIPTION, MockSignalingOutput,
    MockTransportFactory, RecordingPresenter,
};

fn offer_from(sender: &str) -> SignalMessage {
    SignalMessage::Offer {
        sender: PeerId::from(sender),
        target: PeerId::from("me"),
        offer: SessionDescription::offer("v=0"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_candidates_sent_in_batches() {
    init_tracing();

    let signaling = MockSignalingOutput::new_stored_only();
    let services = MeshServices {
        signaling: Arc::new(signaling.clone()),
        transports: Arc::new(MockTransportFactory::new()),
        media: Arc::new(EmptyMediaSource),
        presenter: Arc::new(RecordingPresenter::new()),
    };
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let (mesh, _handle) = Mesh::new(MeshConfig::default(), PeerId::from("me"), services, inbound_rx);
    tokio::spawn(mesh.run());

    let peer = PeerId::from("p2");
    inbound_tx.send(offer_from("p2")).unwrap();

    // Inside the 300 ms window nothing has been sent yet.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(signaling.answers_to(&peer).await.len(), 1);
    assert!(signaling.candidate_batches_to(&peer).await.is_empty());

    tokio::time::sleep(Duration::from_millis(250)).await;
    let batches = signaling.candidate_batches_to(&peer).await;
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), MOCK_CANDIDATES_PER_DESCRIPTION);

    // A later burst goes out as its own batch.
    inbound_tx.send(offer_from("p2")).unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;
    let batches = signaling.candidate_batches_to(&peer).await;
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[1].len(), MOCK_CANDIDATES_PER_DESCRIPTION);
}

#[tokio::test(start_paused = true)]
async fn test_batches_are_kept_per_peer() {
    init_tracing();

    let signaling = MockSignalingOutput::new_stored_only();
    let services = MeshServices {
        signaling: Arc::new(signaling.clone()),
        transports: Arc::new(MockTransportFactory::new()),
        media: Arc::new(EmptyMediaSource),
        presenter: Arc::new(RecordingPresenter::new()),
    };
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let config = MeshConfig {
        candidate_batch_window: Duration::from_millis(50),
        ..MeshConfig::default()
    };
    let (mesh, _handle) = Mesh::new(config, PeerId::from("me"), services, inbound_rx);
    tokio::spawn(mesh.run());

    inbound_tx.send(offer_from("p2")).unwrap();
    inbound_tx.send(offer_from("p3")).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    for peer in ["p2", "p3"] {
        let batches = signaling.candidate_batches_to(&PeerId::from(peer)).await;
        assert_eq!(batches.len(), 1, "batches for {}", peer);
        assert_eq!(batches[0].len(), MOCK_CANDIDATES_PER_DESCRIPTION);
    }
}
