//! Shared fixtures for app integration tests.
//!
//! Each integration binary uses its own subset of these helpers.
#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use brandlens_core::{MediaKind, SelectedMedia};
use brandlens_ui::SubmissionHandoff;
use brandlens_upload::{
    CritiqueClient, CritiqueRequest, CritiqueTransport, TransportReply, UploadError,
};

/// Canned service base URL used by client fixtures.
pub const TEST_BASE_URL: &str = "http://analysis.test";

/// Builds a complete critique body for an image ad.
pub fn critique_json_image() -> String {
    serde_json::json!({
        "brand": "nike",
        "overall_score": 82.0,
        "media_type": "image",
        "brand_alignment": {"score": 88.0, "feedback": "Swoosh placement is strong."},
        "visual_quality": {"score": 79.0, "feedback": "Sharp, well-lit composition."},
        "message_clarity": {"score": 84.0, "feedback": "Clear call to action."},
        "safety_ethics": {"score": 77.0, "feedback": "Nothing off-brand or unsafe."},
        "strengths": ["Bold color blocking", "Readable tagline"],
        "issues": ["Logo is small at thumbnail size"],
        "suggestions": ["Increase logo scale", "Tighten the headline"]
    })
    .to_string()
}

/// Builds a complete critique body for a video ad, audio section included.
pub fn critique_json_video() -> String {
    serde_json::json!({
        "brand": "apple",
        "overall_score": 68.0,
        "media_type": "video",
        "brand_alignment": {"score": 72.0, "feedback": "Tone mostly matches."},
        "visual_quality": {"score": 66.0, "feedback": "Some soft focus mid-spot."},
        "message_clarity": {"score": 61.0, "feedback": "Value proposition lands late."},
        "safety_ethics": {"score": 90.0, "feedback": "Clean throughout."},
        "audio_quality": {
            "score": 58.0,
            "feedback": "Mix favors music over voice.",
            "voice_analysis": "Voice-over is clear but quiet.",
            "music_analysis": "Track fits the brand mood.",
            "sound_effects": "Minimal, used tastefully.",
            "sync_quality": "Cuts land on the beat."
        },
        "strengths": ["Strong opening shot"],
        "issues": ["Dialogue buried in the mix"],
        "suggestions": ["Raise voice-over by 3dB"]
    })
    .to_string()
}

/// Builds accepted media of the requested kind.
pub fn media_fixture(kind: MediaKind) -> SelectedMedia {
    match kind {
        MediaKind::Image => SelectedMedia {
            file_name: "ad.png".to_string(),
            mime: "image/png".to_string(),
            kind,
            bytes: vec![1, 2, 3, 4],
        },
        MediaKind::Video => SelectedMedia {
            file_name: "spot.mp4".to_string(),
            mime: "video/mp4".to_string(),
            kind,
            bytes: vec![9, 8, 7, 6],
        },
    }
}

/// Builds a complete submission hand-off.
pub fn handoff_fixture(kind: MediaKind, brand: &str) -> SubmissionHandoff {
    let media = media_fixture(kind);
    SubmissionHandoff {
        kind: media.kind,
        media,
        brand: brand.to_string(),
    }
}

/// Transport that always returns one canned reply.
pub struct CannedTransport {
    reply: TransportReply,
}

impl CannedTransport {
    /// Creates a transport replying with `status` and `body`.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            reply: TransportReply {
                status,
                body: body.into(),
            },
        }
    }
}

impl CritiqueTransport for CannedTransport {
    fn submit(&self, _request: &CritiqueRequest) -> Result<TransportReply, UploadError> {
        Ok(self.reply.clone())
    }
}

/// Transport that records every envelope it is asked to send.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<CritiqueRequest>>,
    reply_body: String,
}

impl RecordingTransport {
    /// Creates a recorder that replies 200 with `body`.
    pub fn replying(body: impl Into<String>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            reply_body: body.into(),
        }
    }

    /// Returns the envelopes sent so far.
    pub fn requests(&self) -> Vec<CritiqueRequest> {
        self.requests.lock().expect("request lock should work").clone()
    }
}

impl CritiqueTransport for RecordingTransport {
    fn submit(&self, request: &CritiqueRequest) -> Result<TransportReply, UploadError> {
        self.requests
            .lock()
            .expect("request lock should work")
            .push(request.clone());
        Ok(TransportReply {
            status: 200,
            body: self.reply_body.clone(),
        })
    }
}

/// Builds a client over the given transport with a short timeout.
pub fn client_with(transport: std::sync::Arc<dyn CritiqueTransport>) -> CritiqueClient {
    CritiqueClient::new(TEST_BASE_URL, Duration::from_secs(5), transport)
        .expect("test client should build")
}
