//! Validates contract fixtures against the frozen JSON schema, and the
//! Rust-side parser against the same fixtures.

use brandlens_contract::parse_critique_response;
use jsonschema::JSONSchema;
use serde_json::Value;

fn load_json(path: &str) -> Value {
    let raw = std::fs::read_to_string(path).expect("json file should be readable");
    serde_json::from_str(&raw).expect("json file should be valid")
}

fn compile_validator() -> JSONSchema {
    let schema = load_json(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/critique-response.schema.json"
    ));
    JSONSchema::compile(&schema).expect("schema should compile")
}

#[test]
fn image_fixture_matches_schema() {
    let validator = compile_validator();
    let fixture = load_json(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/fixtures/critique-response.image.valid.json"
    ));
    assert!(
        validator.is_valid(&fixture),
        "image fixture should validate against schema"
    );
}

#[test]
fn video_fixture_matches_schema() {
    let validator = compile_validator();
    let fixture = load_json(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/fixtures/critique-response.video.valid.json"
    ));
    assert!(
        validator.is_valid(&fixture),
        "video fixture should validate against schema"
    );
}

#[test]
fn missing_fields_fixture_is_rejected_by_schema_and_parser() {
    let validator = compile_validator();
    let path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/fixtures/critique-response.missing-fields.json"
    );
    let fixture = load_json(path);
    assert!(
        !validator.is_valid(&fixture),
        "truncated fixture should fail schema validation"
    );

    let raw = std::fs::read_to_string(path).expect("fixture should be readable");
    assert!(
        parse_critique_response(&raw).is_err(),
        "truncated fixture should fail client-side validation"
    );
}

#[test]
fn parser_accepts_both_valid_fixtures() {
    for path in [
        concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../contracts/fixtures/critique-response.image.valid.json"
        ),
        concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../contracts/fixtures/critique-response.video.valid.json"
        ),
    ] {
        let raw = std::fs::read_to_string(path).expect("fixture should be readable");
        parse_critique_response(&raw).expect("valid fixture should parse");
    }
}
