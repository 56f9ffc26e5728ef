//! Integration tests for the copy-as-JSON view.

mod common;

use brandlens_contract::{CritiqueResult, parse_critique_response};

#[test]
fn json_roundtrip_tests_copied_text_parses_back_identically() {
    let result = parse_critique_response(&common::critique_json_video())
        .expect("fixture should parse");

    let copied = result.to_pretty_json().expect("result should serialize");
    let reparsed: CritiqueResult =
        serde_json::from_str(&copied).expect("copied JSON should parse back");

    assert_eq!(reparsed, result);
}

#[test]
fn json_roundtrip_tests_view_uses_two_space_indent() {
    let result = parse_critique_response(&common::critique_json_image())
        .expect("fixture should parse");
    let rendered = result.to_pretty_json().expect("result should serialize");

    let mut lines = rendered.lines();
    assert_eq!(lines.next(), Some("{"));
    let second = lines.next().expect("object should span lines");
    assert!(second.starts_with("  ") && !second.starts_with("   "));
}

#[test]
fn json_roundtrip_tests_absent_audio_section_stays_absent() {
    let result = parse_critique_response(&common::critique_json_image())
        .expect("fixture should parse");
    let rendered = result.to_pretty_json().expect("result should serialize");

    assert!(!rendered.contains("audio_quality"));
}
