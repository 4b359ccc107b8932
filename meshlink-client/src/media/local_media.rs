use std::sync::Arc;

use async_trait::async_trait;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

use crate::error::Result;

pub type LocalTrack = Arc<dyn TrackLocal + Send + Sync>;

/// Combined local audio/video stream attached to every peer connection.
#[derive(Clone)]
pub struct LocalStream {
    pub id: String,
    pub tracks: Vec<LocalTrack>,
}

/// Media received from one remote participant.
#[derive(Clone)]
pub struct RemoteStream {
    pub id: String,
    pub tracks: Vec<Arc<TrackRemote>>,
}

/// Source of the local capture stream.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn acquire(&self) -> Result<LocalStream>;
}

/// Opus + VP8 sample tracks with nothing written to them.
///
/// Stands in for a camera and microphone: negotiation and track plumbing are
/// exercised without any capture or encoding.
pub struct StaticMediaSource {
    stream_id: String,
}

impl StaticMediaSource {
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
        }
    }
}

#[async_trait]
impl MediaSource for StaticMediaSource {
    async fn acquire(&self) -> Result<LocalStream> {
        let audio = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48000,
                channels: 2,
                ..Default::default()
            },
            "audio".to_owned(),
            self.stream_id.clone(),
        ));
        let video = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90000,
                ..Default::default()
            },
            "video".to_owned(),
            self.stream_id.clone(),
        ));

        Ok(LocalStream {
            id: self.stream_id.clone(),
            tracks: vec![audio, video],
        })
    }
}
