//! End-to-end decoding of small, complete streams.
//!
//! Each fixture under `tests/golden/` is a whole stream, header to
//! `MessageEnd`, stored as hex. The tests walk the same path the CLI
//! does: decode, find the root, backfill, crunch.

use nrbf_decoder::DecoderOptions;
use nrbf_driver::{DecodedStream, DefaultDriver, DriverConfig, NrbfDriver, OutputMode, decode_stream};
use nrbf_tests::golden;
use nrbf_types::{Record, RecordType};
use serde_json::json;

// ── Helpers ───────────────────────────────────────────────────────────

fn decode(name: &str) -> DecodedStream {
    decode_stream(&golden(name), DecoderOptions::default())
        .unwrap_or_else(|e| panic!("{name} failed to decode: {e}"))
}

fn record_types(stream: &DecodedStream) -> Vec<RecordType> {
    stream.top_level().map(Record::record_type).collect()
}

// ── Minimal string stream ─────────────────────────────────────────────

#[test]
fn hello_string_is_three_records() {
    let stream = decode("hello_string.hex");
    assert_eq!(
        record_types(&stream),
        [
            RecordType::SerializedStreamHeader,
            RecordType::BinaryObjectString,
            RecordType::MessageEnd
        ]
    );
    assert!(stream.warnings().is_empty());
}

#[test]
fn hello_string_root_is_the_string_record() {
    let stream = decode("hello_string.hex");
    let root = stream.root().unwrap();
    assert_eq!(
        stream.arena()[root],
        Record::BinaryObjectString {
            object_id: 1,
            value: "hello".into()
        }
    );
}

#[test]
fn hello_string_crunches_to_bare_string() {
    let mut stream = decode("hello_string.hex");
    assert_eq!(stream.crunch().unwrap(), json!("hello"));
}

// ── Class with a single string member ─────────────────────────────────

#[test]
fn person_name_crunches_to_mapping() {
    let mut stream = decode("person_name.hex");
    assert_eq!(stream.crunch().unwrap(), json!({"Name": "Alice"}));
}

#[test]
fn person_name_library_table() {
    let stream = decode("person_name.hex");
    assert_eq!(stream.libraries().get(&2).map(String::as_str), Some("Lib"));
    assert_eq!(stream.object_definitions(), 2);
    assert_eq!(stream.object_references(), 0);
}

#[test]
fn person_name_root_literal() {
    let mut stream = decode("person_name.hex");
    let config = DriverConfig {
        mode: OutputMode::Root,
        ..DriverConfig::default()
    };
    let rendered = DefaultDriver.render(&mut stream, &config).unwrap();
    insta::assert_snapshot!(serde_json::to_string(&rendered).unwrap(), @r#"{"RecordTypeEnum":"ClassWithMembersAndTypes","ClassInfo":{"ObjectId":1,"Name":"Person","MemberCount":1,"MemberNames":["Name"]},"MemberTypeInfo":{"BinaryTypeEnums":["String"],"AdditionalInfos":[null]},"LibraryId":2,"Values":[{"RecordTypeEnum":"BinaryObjectString","ObjectId":3,"Value":"Alice"}]}"#);
}

// ── Forward reference ─────────────────────────────────────────────────

#[test]
fn forward_reference_resolves_to_later_object() {
    let mut stream = decode("forward_reference.hex");
    assert_eq!(stream.object_references(), 1);
    assert_eq!(
        stream.crunch().unwrap(),
        json!({"first": "later", "second": "same"})
    );
}

#[test]
fn forward_reference_equals_direct_decode() {
    let mut stream = decode("forward_reference.hex");
    let root = stream.backfill().unwrap();
    let reference = stream.arena()[root].class_values().unwrap()[0]
        .as_record()
        .unwrap();
    let Record::MemberReference(reference) = &stream.arena()[reference] else {
        panic!("first member is not a reference");
    };
    let target = reference.resolved.unwrap();

    let direct = decode_stream(
        &nrbf_tests::StreamBuilder::new()
            .header(3)
            .object_string(3, "later")
            .message_end()
            .build(),
        DecoderOptions::default(),
    )
    .unwrap();
    let direct_root = direct.root().unwrap();
    assert_eq!(stream.arena()[target], direct.arena()[direct_root]);
}

// ── Whole-buffer driver ───────────────────────────────────────────────

#[test]
fn concatenated_golden_streams() {
    let mut bytes = golden("hello_string.hex");
    bytes.extend(golden("person_name.hex"));
    let config = DriverConfig {
        mode: OutputMode::Crunch,
        ..DriverConfig::default()
    };
    let out = DefaultDriver.render_bytes(&bytes, &config).unwrap();
    assert_eq!(out, [json!("hello"), json!({"Name": "Alice"})]);
}
