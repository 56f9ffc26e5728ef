//! Integration tests for transport failure handling.

mod common;

use std::sync::Arc;

use brandlens_app::execute_submission;
use brandlens_core::MediaKind;
use brandlens_ui::{CritiqueSession, MemorySink, NoticeTone, SessionState};
use brandlens_upload::{CritiqueRequest, CritiqueTransport, TransportReply, UploadError};

struct TimedOutTransport;

impl CritiqueTransport for TimedOutTransport {
    fn submit(&self, _request: &CritiqueRequest) -> Result<TransportReply, UploadError> {
        Err(UploadError::Timeout)
    }
}

struct UnreachableTransport;

impl CritiqueTransport for UnreachableTransport {
    fn submit(&self, _request: &CritiqueRequest) -> Result<TransportReply, UploadError> {
        Err(UploadError::Network("connection refused".to_string()))
    }
}

fn run_failing(transport: Arc<dyn CritiqueTransport>) -> (CritiqueSession, MemorySink) {
    let sink = MemorySink::new();
    let client = common::client_with(transport);
    let mut session = CritiqueSession::new();
    execute_submission(
        &mut session,
        &client,
        &common::handoff_fixture(MediaKind::Image, "nike"),
        &sink,
    )
    .expect("failure should still resolve the session");
    (session, sink)
}

#[test]
fn transport_failure_tests_non_success_status_fails_without_reading_body() {
    let (session, sink) = run_failing(Arc::new(common::CannedTransport::new(
        503,
        common::critique_json_image(),
    )));

    assert_eq!(
        session.state(),
        &SessionState::Failed("analysis service returned HTTP 503".to_string())
    );
    let notices = sink.drain();
    assert_eq!(notices[0].tone, NoticeTone::Destructive);
    assert_eq!(notices[0].title, "Analysis Failed");
}

#[test]
fn transport_failure_tests_timeout_is_reported_as_transport_failure() {
    let (session, _sink) = run_failing(Arc::new(TimedOutTransport));
    assert_eq!(
        session.state(),
        &SessionState::Failed("analysis request timed out".to_string())
    );
}

#[test]
fn transport_failure_tests_network_failure_keeps_the_reason() {
    let (session, sink) = run_failing(Arc::new(UnreachableTransport));
    assert_eq!(
        session.state(),
        &SessionState::Failed("network failure: connection refused".to_string())
    );
    assert_eq!(
        sink.drain()[0].detail,
        "network failure: connection refused"
    );
}

#[test]
fn transport_failure_tests_no_automatic_retry() {
    let sink = MemorySink::new();
    let transport = Arc::new(CountingFailTransport::default());
    let client = common::client_with(transport.clone());
    let mut session = CritiqueSession::new();

    execute_submission(
        &mut session,
        &client,
        &common::handoff_fixture(MediaKind::Image, "nike"),
        &sink,
    )
    .expect("failure should resolve");

    assert_eq!(*transport.attempts.lock().expect("lock should work"), 1);
}

#[derive(Default)]
struct CountingFailTransport {
    attempts: std::sync::Mutex<u32>,
}

impl CritiqueTransport for CountingFailTransport {
    fn submit(&self, _request: &CritiqueRequest) -> Result<TransportReply, UploadError> {
        *self.attempts.lock().expect("lock should work") += 1;
        Err(UploadError::Timeout)
    }
}
