//! Integration tests for the submission gate and envelope assembly.

mod common;

use std::sync::Arc;

use brandlens_app::execute_submission;
use brandlens_core::{FileCandidate, MediaKind, UploadPolicy};
use brandlens_ui::{CritiqueSession, MemorySink, UploadForm};

#[test]
fn submission_gate_tests_never_submits_with_missing_inputs() {
    let sink = MemorySink::new();
    let transport = Arc::new(common::RecordingTransport::replying(
        common::critique_json_image(),
    ));
    let client = common::client_with(transport.clone());
    let mut session = CritiqueSession::new();

    // Neither brand nor file.
    let mut form = UploadForm::new(UploadPolicy::image_and_video());
    assert!(form.submission(&sink).is_none());

    // Brand only.
    form.select_brand("nike");
    assert!(form.submission(&sink).is_none());

    // File only.
    let mut file_only = UploadForm::new(UploadPolicy::image_and_video());
    let candidate = FileCandidate::with_mime("ad.png", "image/png", vec![1, 2, 3]);
    file_only
        .select_file(Some(candidate), &sink)
        .expect("candidate should be accepted");
    assert!(file_only.submission(&sink).is_none());

    // The analysis callback never ran and the session never left Idle.
    assert!(transport.requests().is_empty());
    assert!(!session.is_submitting());
    assert_eq!(
        sink.drain()
            .iter()
            .filter(|n| n.title == "Missing information")
            .count(),
        3
    );

    // A complete form submits exactly once.
    form.select_file(
        Some(FileCandidate::with_mime("ad.png", "image/png", vec![1, 2, 3])),
        &sink,
    )
    .expect("candidate should be accepted");
    let handoff = form.submission(&sink).expect("complete form should hand off");
    execute_submission(&mut session, &client, &handoff, &sink)
        .expect("submission should run");
    assert_eq!(transport.requests().len(), 1);
}

#[test]
fn submission_gate_tests_envelope_carries_file_and_brand_fields() {
    let sink = MemorySink::new();
    let transport = Arc::new(common::RecordingTransport::replying(
        common::critique_json_image(),
    ));
    let client = common::client_with(transport.clone());
    let mut session = CritiqueSession::new();

    let handoff = common::handoff_fixture(MediaKind::Image, "nike");
    execute_submission(&mut session, &client, &handoff, &sink)
        .expect("submission should run");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(
        request.endpoint.as_str(),
        format!("{}/critique", common::TEST_BASE_URL)
    );
    assert_eq!(request.brand, "nike");
    assert_eq!(request.file_name, "ad.png");
    assert_eq!(request.mime, "image/png");
    assert_eq!(request.body, handoff.media.bytes);
}
